pub mod batch;
pub mod design;
pub mod hairpin;
pub mod tm;
