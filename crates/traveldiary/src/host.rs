//! Device services for a desktop host.
//!
//! A terminal has no camera roll, GPS or geocoder, so these adapters take
//! their answers from the command line or configuration instead.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::address::GeocodedAddress;
use crate::capture::{
    Accuracy, Geocoder, ImagePicker, ImageRef, ImageSource, LocationProvider, PermissionStatus,
    Position,
};
use crate::error::{Error, Result};

/// Picks an existing image file from disk.
#[derive(Debug, Clone, Default)]
pub struct FileImagePicker {
    path: Option<PathBuf>,
}

impl FileImagePicker {
    /// Pick `path`, or behave as a cancelled pick when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for FileImagePicker {
    async fn request_permission(&self, _source: ImageSource) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn pick(&self, source: ImageSource) -> Result<Option<ImageRef>> {
        if source == ImageSource::Camera {
            return Err(Error::device_unavailable("no camera on this host"));
        }

        let Some(path) = &self.path else {
            return Ok(None);
        };

        let absolute = tokio::fs::canonicalize(path).await.map_err(|e| {
            Error::device_unavailable(format!("cannot read image {}: {e}", path.display()))
        })?;
        if !absolute.is_file() {
            return Err(Error::device_unavailable(format!(
                "{} is not a file",
                absolute.display()
            )));
        }

        debug!("Picked {}", absolute.display());
        Ok(Some(ImageRef::new(format!("file://{}", absolute.display()))))
    }
}

/// Reports a position supplied up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    position: Option<Position>,
}

impl FixedLocationProvider {
    /// Report `position`, or fail to get a fix when `None`.
    #[must_use]
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Position> {
        match self.position {
            Some(position) if position.is_valid() => Ok(position),
            Some(position) => Err(Error::device_unavailable(format!(
                "coordinates out of range: {}, {}",
                position.latitude, position.longitude
            ))),
            None => Err(Error::device_unavailable(
                "no location fix; pass --lat and --lon or set capture.latitude/longitude",
            )),
        }
    }
}

/// Returns address components entered by the user.
#[derive(Debug, Clone, Default)]
pub struct ManualGeocoder {
    address: GeocodedAddress,
}

impl ManualGeocoder {
    /// Answer every lookup with `address`.
    #[must_use]
    pub fn new(address: GeocodedAddress) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Geocoder for ManualGeocoder {
    async fn reverse_geocode(&self, _position: Position) -> Result<Vec<GeocodedAddress>> {
        if self.address.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![self.address.clone()])
        }
    }
}
