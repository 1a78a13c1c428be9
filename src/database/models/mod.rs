pub mod column;
pub mod ticket;
pub mod ticket_assignee;
pub mod user;

pub use column::{Column, ColumnCreate, ColumnPatch};
pub use ticket::{Ticket, TicketCreate, TicketPatch};
pub use ticket_assignee::{TicketAssignee, TicketAssigneeCreate, TicketAssigneePatch};
pub use user::{FrameCollaborator, User, UserCreate, UserPatch, UserSummary};
