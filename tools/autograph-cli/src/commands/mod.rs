pub mod claim;
pub mod fields;
pub mod hash;
pub mod issue;
pub mod mint;
pub mod sign;
pub mod verify;
