use super::{FieldKind, FieldSpec, Schema};

pub static TICKET_ASSIGNEE_CREATE: Schema = Schema {
    entity: "ticket_assignees",
    require_some: false,
    fields: &[
        FieldSpec { name: "ticket_id", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "user_id", kind: FieldKind::NonEmptyString, required: true },
    ],
};

pub static TICKET_ASSIGNEE_UPDATE: Schema = Schema {
    entity: "ticket_assignees",
    require_some: true,
    fields: &[
        FieldSpec { name: "ticket_id", kind: FieldKind::NonEmptyString, required: false },
        FieldSpec { name: "user_id", kind: FieldKind::NonEmptyString, required: false },
    ],
};
