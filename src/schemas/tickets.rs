use super::{FieldKind, FieldSpec, Schema};

pub static TICKET_CREATE: Schema = Schema {
    entity: "tickets",
    require_some: false,
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "description", kind: FieldKind::String, required: false },
    ],
};

pub static TICKET_UPDATE: Schema = Schema {
    entity: "tickets",
    require_some: true,
    fields: &[
        FieldSpec { name: "title", kind: FieldKind::NonEmptyString, required: false },
        FieldSpec { name: "description", kind: FieldKind::String, required: false },
    ],
};
