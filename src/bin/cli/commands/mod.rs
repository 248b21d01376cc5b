pub mod add;
pub mod due;
pub mod edit;
pub mod list;
pub mod review;
pub mod settings;
pub mod transfer;
