pub mod analysis;
pub mod home;
pub mod map;
pub mod panels;
pub mod plot;
pub mod widgets;
