pub mod delivery_booking;
