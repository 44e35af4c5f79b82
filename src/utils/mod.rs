pub mod lib_download;

#[cfg(test)]
pub(crate) mod fake_transport;
#[cfg(test)]
pub(crate) mod log_capture;
