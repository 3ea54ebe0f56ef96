use crate::{Driver, Image, PrintData};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::os::raw::c_int;

/// An open fingerprint device. The device is closed when the value is dropped.
#[derive(Debug)]
pub struct Device(*mut fprint_sys::fp_dev);

impl Device {
    pub(crate) fn from_raw(device: *mut fprint_sys::fp_dev) -> crate::Result<Self> {
        if device.is_null() {
            Err(crate::FPrintError::NullPtr(crate::NullPtrContext::OpenDevice))
        } else {
            Ok(Device(device))
        }
    }

    /// Get the `Driver` for a fingerprint device.
    pub fn driver(&self) -> Driver {
        let driver = unsafe { fprint_sys::fp_dev_get_driver(self.0) };

        Driver::new(driver)
    }

    /// Gets the number of enroll stages required to enroll a fingerprint with the device.
    pub fn nr_enroll_stages(&self) -> i32 {
        unsafe { fprint_sys::fp_dev_get_nr_enroll_stages(self.0) as i32 }
    }

    /// Determines if a device has imaging capabilities. If a device has imaging capabilities
    /// you are able to perform imaging operations such as retrieving scan images using
    /// `capture_image`. However, not all devices are imaging devices, some do all processing
    /// in hardware.
    pub fn supports_imaging(&self) -> bool {
        let result = unsafe { fprint_sys::fp_dev_supports_imaging(self.0) };

        result != 0
    }

    /// Determines if a device is capable of identification through `identify_finger_image`.
    /// Not all devices support this functionality.
    pub fn supports_identification(&self) -> bool {
        let result = unsafe { fprint_sys::fp_dev_supports_identification(self.0) };

        result != 0
    }

    /// Captures an image from the device. The returned image is the raw image provided
    /// by the device.
    ///
    /// If set, the `unconditional` flag indicates that the device should capture an image
    /// unconditionally, regardless of whether a finger is there or not. If unset, this function
    /// will block until a finger is detected on the sensor.
    pub fn capture_image(&self, unconditional: bool) -> crate::Result<Image> {
        let mut image: *mut fprint_sys::fp_img = std::ptr::null_mut();
        let result =
            unsafe { fprint_sys::fp_dev_img_capture(self.0, unconditional as c_int, &mut image) };

        match result {
            0 => Image::from_raw(image).ok_or(crate::FPrintError::NullPtr(
                crate::NullPtrContext::CaptureImage,
            )),
            _ if result == -libc::ENOTSUP => Err(crate::FPrintError::NotSupported(
                crate::NotSupportContext::CapturingImage,
            )),
            res => Err(crate::FPrintError::Other(res)),
        }
    }

    /// Performs an enroll stage. See [Enrolling](https://fprint.freedesktop.org/libfprint-stable/libfprint-Devices-operations.html#enrolling)
    /// for an explanation of enroll stages.
    ///
    /// If no enrollment is in process, this kicks off the process and runs the first stage.
    /// If an enrollment is already in progress, calling this function runs the next stage,
    /// which may well be the last.
    ///
    /// A negative error code aborts the enrollment; the next call starts a new one.
    /// `Retry*` results do not advance the stage. `Fail` aborts the enrollment as well.
    /// `Complete` is only returned from the final stage and carries the resultant print.
    pub fn enroll_finger_image(&self) -> crate::Result<EnrollResult> {
        let mut print: *mut fprint_sys::fp_print_data = std::ptr::null_mut();
        let mut image: *mut fprint_sys::fp_img = std::ptr::null_mut();
        let result = unsafe { fprint_sys::fp_enroll_finger_img(self.0, &mut print, &mut image) };
        // scan images are not surfaced by this wrapper
        drop(Image::from_raw(image));

        if result < 0 {
            return Err(crate::FPrintError::UnexpectedAbort(result));
        }

        match result as u32 {
            fprint_sys::fp_enroll_result_FP_ENROLL_COMPLETE => PrintData::from_raw(print)
                .map(EnrollResult::Complete)
                .ok_or(crate::FPrintError::NullPtr(crate::NullPtrContext::EnrollPrint)),
            code => EnrollResult::try_from(code),
        }
    }

    /// Runs a whole enrollment, one stage per iteration. The iterator ends after the stage
    /// that completed the enrollment, failed it or returned an error.
    pub fn enroll(&self) -> Enrollment<'_> {
        Enrollment {
            device: self,
            finished: false,
        }
    }

    /// Performs a new scan and attempts to identify the scanned finger against a collection
    /// of previously enrolled fingerprints.
    ///
    /// `IdentifyResult::Matched` carries the index into `gallery` of the matched print.
    /// This function will not necessarily examine the whole print gallery, it will return
    /// as soon as it finds a matching print.
    ///
    /// Not all devices support identification, `NotSupported` is returned when this is the case.
    pub fn identify_finger_image(&self, gallery: &[PrintData]) -> crate::Result<IdentifyResult> {
        let mut image: *mut fprint_sys::fp_img = std::ptr::null_mut();
        let mut offset: usize = 0;

        // libfprint expects a NULL terminated array of prints
        let mut raw_gallery = gallery.iter().map(PrintData::as_ptr).collect::<Vec<_>>();
        raw_gallery.push(std::ptr::null_mut());

        let result = unsafe {
            fprint_sys::fp_identify_finger_img(
                self.0,
                raw_gallery.as_mut_ptr(),
                &mut offset as *mut usize as *mut _,
                &mut image,
            )
        };
        drop(Image::from_raw(image));

        if result == -libc::ENOTSUP {
            Err(crate::FPrintError::NotSupported(
                crate::NotSupportContext::Identify,
            ))
        } else if result < 0 {
            Err(crate::FPrintError::IdentifyFailed(result))
        } else {
            let result = match VerifyResult::try_from(result as u32)? {
                VerifyResult::Match => IdentifyResult::Matched(offset),
                VerifyResult::NoMatch => IdentifyResult::NoMatch,
                retry => IdentifyResult::Retry(retry),
            };

            Ok(result)
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        unsafe { fprint_sys::fp_dev_close(self.0) }
    }
}

/// Stage-by-stage enrollment driven by `Device::enroll`.
pub struct Enrollment<'a> {
    device: &'a Device,
    finished: bool,
}

impl<'a> Iterator for Enrollment<'a> {
    type Item = crate::Result<EnrollResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.device.enroll_finger_image();
        self.finished = !matches!(
            result,
            Ok(EnrollResult::Pass)
                | Ok(EnrollResult::Retry)
                | Ok(EnrollResult::RetryTooShort)
                | Ok(EnrollResult::RetryCenterFinger)
                | Ok(EnrollResult::RetryRemoveFinger)
        );

        Some(result)
    }
}

/// Enrollment result codes returned from `Device::enroll_finger_image`. Result codes with `Retry`
/// in the name suggest that the scan failed due to user error. Applications will generally
/// want to inform the user of the problem and then retry the enrollment stage.
#[derive(Debug)]
pub enum EnrollResult {
    /// Enrollment completed, the resultant print is attached.
    Complete(PrintData),
    /// Enrollment failed due to incomprehensible data; this may occur when
    /// the user scans a different finger on each enroll stage.
    Fail,
    /// Enroll stage passed; more stages are need to complete the process.
    Pass,
    /// The enrollment scan did not succeed due to poor scan quality or
    /// other general user scanning problem.
    Retry,
    /// The enrollment scan did not succeed because the finger swipe was
    /// too short.
    RetryTooShort,
    /// The enrollment scan did not succeed because the finger was not
    /// centered on the scanner.
    RetryCenterFinger,
    /// The scan did not succeed due to quality or pressure problems; the user
    /// should remove their finger from the scanner before retrying.
    RetryRemoveFinger,
}

impl Display for EnrollResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let string = match self {
            EnrollResult::Complete(_) => "Complete",
            EnrollResult::Fail => "Fail",
            EnrollResult::Pass => "Pass",
            EnrollResult::Retry => "Retry",
            EnrollResult::RetryTooShort => "Retry: too short",
            EnrollResult::RetryCenterFinger => "Retry: center finger",
            EnrollResult::RetryRemoveFinger => "Retry: remove finger",
        };

        write!(f, "{}", string)
    }
}

/// Every code except `Complete`, which needs the print data.
impl TryFrom<u32> for EnrollResult {
    type Error = crate::FPrintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            fprint_sys::fp_enroll_result_FP_ENROLL_FAIL => Ok(EnrollResult::Fail),
            fprint_sys::fp_enroll_result_FP_ENROLL_PASS => Ok(EnrollResult::Pass),
            fprint_sys::fp_enroll_result_FP_ENROLL_RETRY => Ok(EnrollResult::Retry),
            fprint_sys::fp_enroll_result_FP_ENROLL_RETRY_TOO_SHORT => {
                Ok(EnrollResult::RetryTooShort)
            }
            fprint_sys::fp_enroll_result_FP_ENROLL_RETRY_CENTER_FINGER => {
                Ok(EnrollResult::RetryCenterFinger)
            }
            fprint_sys::fp_enroll_result_FP_ENROLL_RETRY_REMOVE_FINGER => {
                Ok(EnrollResult::RetryRemoveFinger)
            }
            n => Err(crate::FPrintError::TryFromError(n)),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum VerifyResult {
    /// The scan completed successfully, but the newly scanned fingerprint
    /// does not match the fingerprint being verified against.
    NoMatch,
    /// The scan completed successfully and the newly scanned fingerprint does
    /// match the fingerprint being verified.
    Match,
    /// The scan did not succeed due to poor scan quality or other general
    /// user scanning problem.
    Retry,
    /// The scan did not succeed because the finger swipe was too short.
    RetryTooShort,
    /// The scan did not succeed because the finger was not centered on the scanner.
    RetryCenterFinger,
    /// The scan did not succeed due to quality or pressure problems; the user
    /// should remove their finger from the scanner before retrying.
    RetryRemoveFinger,
}

impl Display for VerifyResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let string = match self {
            VerifyResult::NoMatch => "NoMatch",
            VerifyResult::Match => "Match",
            VerifyResult::Retry => "Retry",
            VerifyResult::RetryTooShort => "RetryTooShort",
            VerifyResult::RetryCenterFinger => "RetryCenterFinger",
            VerifyResult::RetryRemoveFinger => "RetryRemoveFinger",
        };

        write!(f, "{}", string)
    }
}

impl TryFrom<u32> for VerifyResult {
    type Error = crate::FPrintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            fprint_sys::fp_verify_result_FP_VERIFY_NO_MATCH => Ok(VerifyResult::NoMatch),
            fprint_sys::fp_verify_result_FP_VERIFY_MATCH => Ok(VerifyResult::Match),
            fprint_sys::fp_verify_result_FP_VERIFY_RETRY => Ok(VerifyResult::Retry),
            fprint_sys::fp_verify_result_FP_VERIFY_RETRY_TOO_SHORT => {
                Ok(VerifyResult::RetryTooShort)
            }
            fprint_sys::fp_verify_result_FP_VERIFY_RETRY_CENTER_FINGER => {
                Ok(VerifyResult::RetryCenterFinger)
            }
            fprint_sys::fp_verify_result_FP_VERIFY_RETRY_REMOVE_FINGER => {
                Ok(VerifyResult::RetryRemoveFinger)
            }
            n => Err(crate::FPrintError::TryFromError(n)),
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum IdentifyResult {
    /// Index into the gallery of the matched print.
    Matched(usize),
    NoMatch,
    /// The scan itself did not succeed and should be repeated.
    Retry(VerifyResult),
}

impl Display for IdentifyResult {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            IdentifyResult::Matched(offset) => write!(f, "Identity result offset: {}", offset),
            IdentifyResult::NoMatch => write!(f, "NoMatch"),
            IdentifyResult::Retry(reason) => write!(f, "{}", reason),
        }
    }
}
