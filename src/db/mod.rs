pub mod ftv;
pub mod prod_db;
