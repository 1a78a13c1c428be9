use super::{FieldKind, FieldSpec, Schema};

/// `password` is write-only: it is routed to the identity subsystem and never
/// stored in the users table.
pub static USER_CREATE: Schema = Schema {
    entity: "users",
    require_some: false,
    fields: &[
        FieldSpec { name: "email", kind: FieldKind::Email, required: true },
        FieldSpec { name: "first_name", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "last_name", kind: FieldKind::NonEmptyString, required: true },
        FieldSpec { name: "password", kind: FieldKind::Password, required: false },
    ],
};

/// Password changes go through the dedicated password operation, so the
/// update schema does not accept one.
pub static USER_UPDATE: Schema = Schema {
    entity: "users",
    require_some: true,
    fields: &[
        FieldSpec { name: "email", kind: FieldKind::Email, required: false },
        FieldSpec { name: "first_name", kind: FieldKind::NonEmptyString, required: false },
        FieldSpec { name: "last_name", kind: FieldKind::NonEmptyString, required: false },
    ],
};
