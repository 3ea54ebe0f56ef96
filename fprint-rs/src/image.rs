/// A scan image owned by libfprint. Freed on drop.
#[derive(Debug)]
pub struct Image(*mut fprint_sys::fp_img);

impl Image {
    pub(crate) fn from_raw(image: *mut fprint_sys::fp_img) -> Option<Self> {
        if image.is_null() {
            None
        } else {
            Some(Image(image))
        }
    }

    /// Gets the pixel height of an image.
    pub fn height(&self) -> i32 {
        unsafe { fprint_sys::fp_img_get_height(self.0) }
    }

    /// Gets the pixel width of an image.
    pub fn width(&self) -> i32 {
        unsafe { fprint_sys::fp_img_get_width(self.0) }
    }

    /// Copies the 8-bit greyscale data of the image, row by row.
    pub fn pixels(&self) -> Vec<u8> {
        let len = self.width().max(0) as usize * self.height().max(0) as usize;
        let data = unsafe { fprint_sys::fp_img_get_data(self.0) };

        if data.is_null() || len == 0 {
            return Vec::new();
        }

        unsafe { std::slice::from_raw_parts(data as *const u8, len) }.to_vec()
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        unsafe { fprint_sys::fp_img_free(self.0) }
    }
}
