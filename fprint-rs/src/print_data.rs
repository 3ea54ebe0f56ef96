use std::os::raw::c_uchar;

/// A stored print produced by enrollment.
#[derive(Debug)]
pub struct PrintData(*mut fprint_sys::fp_print_data);

impl PrintData {
    pub(crate) fn from_raw(data: *mut fprint_sys::fp_print_data) -> Option<Self> {
        if data.is_null() {
            None
        } else {
            Some(PrintData(data))
        }
    }

    pub(crate) fn as_ptr(&self) -> *mut fprint_sys::fp_print_data {
        self.0
    }

    /// Convert a stored print into a unified representation inside a data buffer.
    /// The buffer can be stored in any way that suits you and loaded back at
    /// some later time using `PrintData::from_bytes()`.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut buf: *mut c_uchar = std::ptr::null_mut();
        let length = unsafe { fprint_sys::fp_print_data_get_data(self.0, &mut buf) };

        if length == 0 || buf.is_null() {
            return Err(crate::FPrintError::ConvertationFailed);
        }

        let data = unsafe { std::slice::from_raw_parts(buf, length as usize) }.to_vec();
        // the buffer is allocated by libfprint with malloc
        unsafe { libc::free(buf as *mut libc::c_void) };

        Ok(data)
    }

    /// Load a stored print from a data buffer. The contents of said buffer must be the untouched
    /// contents of a buffer previously supplied by `PrintData::to_bytes()`.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> crate::Result<Self> {
        let bytes = bytes.as_ref();
        let print = unsafe {
            fprint_sys::fp_print_data_from_data(bytes.as_ptr() as *mut c_uchar, bytes.len() as _)
        };

        PrintData::from_raw(print).ok_or(crate::FPrintError::InvalidPrintData)
    }
}

impl Drop for PrintData {
    fn drop(&mut self) {
        unsafe { fprint_sys::fp_print_data_free(self.0) }
    }
}
