use super::{FieldKind, FieldSpec, Schema};

pub static COLUMN_CREATE: Schema = Schema {
    entity: "columns",
    require_some: false,
    fields: &[
        FieldSpec { name: "name", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "frameId", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "tickets", kind: FieldKind::StringArray, required: false },
    ],
};

pub static COLUMN_UPDATE: Schema = Schema {
    entity: "columns",
    require_some: true,
    fields: &[
        FieldSpec { name: "name", kind: FieldKind::NonEmptyString, required: false },
        FieldSpec { name: "frameId", kind: FieldKind::NonEmptyString, required: false },
        FieldSpec { name: "tickets", kind: FieldKind::StringArray, required: false },
    ],
};
