pub mod booking_calendar;
pub mod booking_form;
pub mod header;
pub mod slot_picker;
