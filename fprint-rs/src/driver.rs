use std::convert::TryFrom;
use std::ffi::CStr;
use std::os::raw::c_char;

/// Internally, libfprint is abstracted into various drivers to communicate with the different types
/// of supported fingerprint readers. Here only the descriptive bits are exposed.
#[derive(Debug)]
pub struct Driver(*mut fprint_sys::fp_driver);

impl Driver {
    pub(crate) fn new(driver: *mut fprint_sys::fp_driver) -> Self {
        Driver(driver)
    }

    /// Retrieves the name of the driver. For example: "upekts"
    pub fn name(&self) -> String {
        unsafe { owned_string(fprint_sys::fp_driver_get_name(self.0)) }
    }

    /// Retrieves a descriptive name of the driver. For example: "UPEK TouchStrip"
    pub fn full_name(&self) -> String {
        unsafe { owned_string(fprint_sys::fp_driver_get_full_name(self.0)) }
    }

    /// Retrieves the scan type for the devices associated with the driver.
    pub fn scan_type(&self) -> crate::Result<ScanType> {
        let scan_type = unsafe { fprint_sys::fp_driver_get_scan_type(self.0) };

        ScanType::try_from(scan_type)
    }
}

unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// Devices require either swiping or pressing the finger on the device.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ScanType {
    /// the reader has a surface area that covers the whole finger
    Press,
    /// the reader requires swiping the finger on a smaller area
    Swipe,
}

impl TryFrom<u32> for ScanType {
    type Error = crate::FPrintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            fprint_sys::fp_scan_type_FP_SCAN_TYPE_PRESS => Ok(ScanType::Press),
            fprint_sys::fp_scan_type_FP_SCAN_TYPE_SWIPE => Ok(ScanType::Swipe),
            n => Err(crate::FPrintError::TryFromError(n)),
        }
    }
}
