#![warn(clippy::all)]
//! Safe wrapper around the synchronous libfprint 0.x API.

mod device;
mod discovered_device;
mod driver;
mod errors;
mod image;
mod print_data;

pub use crate::{
    device::*, discovered_device::*, driver::*, errors::*, image::*, print_data::*,
};

pub type Result<T> = std::result::Result<T, FPrintError>;

/// Library context. Must outlive every device opened through it.
#[derive(Debug)]
pub struct FPrint(());

impl FPrint {
    /// Initialise libfprint.
    ///
    /// To enable debug output of libfprint specifically, use GLib's `G_MESSAGES_DEBUG` environment
    /// variable. To enable debugging of `libusb`, use `LIBUSB_DEBUG`.
    ///
    /// Example:
    /// ```bash
    /// # LIBUSB_DEBUG=4 G_MESSAGES_DEBUG=all my-libfprint-application
    /// ```
    pub fn new() -> crate::Result<FPrint> {
        let res = unsafe { fprint_sys::fp_init() } as i32;

        if res == 0 {
            Ok(FPrint(()))
        } else {
            Err(crate::FPrintError::InitError(res))
        }
    }

    /// Scans the system and returns a list of discovered devices. This is your entry point
    /// into finding a fingerprint reader to operate.
    pub fn discover(&self) -> crate::Result<DiscoveredDevices> {
        let devices_list = unsafe { fprint_sys::fp_discover_devs() };

        DiscoveredDevices::from_raw(devices_list)
    }
}

impl Drop for FPrint {
    fn drop(&mut self) {
        unsafe {
            fprint_sys::fp_exit();
        }
    }
}
