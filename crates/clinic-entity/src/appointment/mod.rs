//! Appointment domain entities and workflow rules.

pub mod action;
pub mod kind;
pub mod message;
pub mod model;
pub mod priority;
pub mod status;

pub use action::{
    ActionStyle, AppointmentAction, AvailableAction, action_catalogue, authorize_action,
    available_actions,
};
pub use kind::AppointmentType;
pub use message::{MessageData, MessageType, NotificationMessage, notification_message};
pub use model::{Appointment, AppointmentDetail, CreateAppointment, StatusChange};
pub use priority::AppointmentPriority;
pub use status::{AppointmentStatus, can_transition_to, transition_table};
