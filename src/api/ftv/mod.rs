pub mod program_guide;
