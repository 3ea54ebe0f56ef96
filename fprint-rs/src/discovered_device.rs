use crate::{Device, Driver};

/// A fingerprint reader found by `FPrint::discover`. It may no longer be available when
/// opened, for example the user may have unplugged it.
#[derive(Debug)]
pub struct DiscoveredDev<'a> {
    inner: *mut fprint_sys::fp_dscv_dev,
    _list: std::marker::PhantomData<&'a DiscoveredDevices>,
}

impl<'a> DiscoveredDev<'a> {
    /// Gets the `Driver` for a discovered device.
    pub fn driver(&self) -> Driver {
        let driver = unsafe { fprint_sys::fp_dscv_dev_get_driver(self.inner) };

        Driver::new(driver)
    }

    /// Opens and initialises a device.
    pub fn open(&self) -> crate::Result<Device> {
        let device = unsafe { fprint_sys::fp_dev_open(self.inner) };

        Device::from_raw(device)
    }
}

/// NULL terminated list of discovered devices, freed on drop.
#[derive(Debug)]
pub struct DiscoveredDevices {
    inner: *mut *mut fprint_sys::fp_dscv_dev,
    count: usize,
}

impl DiscoveredDevices {
    pub(crate) fn from_raw(devices: *mut *mut fprint_sys::fp_dscv_dev) -> crate::Result<Self> {
        if devices.is_null() {
            return Err(crate::FPrintError::NullPtr(crate::NullPtrContext::Discovering));
        }

        let mut count = 0;
        while !unsafe { *devices.add(count) }.is_null() {
            count += 1;
        }

        Ok(DiscoveredDevices {
            inner: devices,
            count,
        })
    }

    pub fn get(&self, index: usize) -> Option<DiscoveredDev<'_>> {
        if index >= self.count {
            return None;
        }

        Some(DiscoveredDev {
            inner: unsafe { *self.inner.add(index) },
            _list: std::marker::PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = DiscoveredDev<'_>> {
        (0..self.count).filter_map(move |index| self.get(index))
    }
}

impl Drop for DiscoveredDevices {
    fn drop(&mut self) {
        unsafe { fprint_sys::fp_dscv_devs_free(self.inner) };
    }
}
