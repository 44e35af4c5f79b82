pub mod ftv;
