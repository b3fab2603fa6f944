//! The image → location → address capture sequence.
//!
//! This module defines the device abstractions the capture flow depends on
//! and the [`CaptureFlow`] state machine that chains them:
//!
//! ```text
//! Idle → ImageAcquired → LocationAcquired → AddressResolved → Ready
//! ```
//!
//! A failure at any step leaves the flow in the last state it reached, so
//! an acquired image survives a location error.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::address::GeocodedAddress;
use crate::error::{Error, Permission, Result};

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The permission is granted.
    Granted,
    /// The permission was refused.
    Denied,
}

impl PermissionStatus {
    /// Check if the permission is granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Where an image comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Take a new photo.
    Camera,
    /// Pick an existing photo.
    Library,
}

impl ImageSource {
    /// The permission guarding this source.
    #[must_use]
    pub fn permission(self) -> Permission {
        match self {
            Self::Camera => Permission::Camera,
            Self::Library => Permission::PhotoLibrary,
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Library => write!(f, "library"),
        }
    }
}

/// Opaque reference to an image owned by the device media layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap a URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The underlying URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested precision of a location fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accuracy {
    /// Coarse, power-saving fix.
    Balanced,
    /// Best available fix.
    #[default]
    High,
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude, -90 to 90.
    pub latitude: f64,
    /// Longitude, -180 to 180.
    pub longitude: f64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates are within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Camera and photo library access.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Ask for the permission guarding `source`.
    async fn request_permission(&self, source: ImageSource) -> Result<PermissionStatus>;

    /// Acquire an image. `Ok(None)` means the user cancelled.
    async fn pick(&self, source: ImageSource) -> Result<Option<ImageRef>>;
}

/// Device positioning.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ask for foreground location permission.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Get the current position.
    async fn current_position(&self, accuracy: Accuracy) -> Result<Position>;
}

/// Reverse geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up address candidates for `position`, best match first.
    async fn reverse_geocode(&self, position: Position) -> Result<Vec<GeocodedAddress>>;
}

/// Where a [`CaptureFlow`] currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CaptureState {
    /// Nothing captured yet.
    #[default]
    Idle,
    /// An image is held; location not yet known.
    ImageAcquired {
        /// The acquired image.
        image: ImageRef,
    },
    /// An image and a position are held.
    LocationAcquired {
        /// The acquired image.
        image: ImageRef,
        /// Where the device was.
        position: Position,
    },
    /// The geocoder returned address components.
    AddressResolved {
        /// The acquired image.
        image: ImageRef,
        /// Where the device was.
        position: Position,
        /// Components of the first geocoder result.
        address: GeocodedAddress,
    },
    /// Image and formatted address are both present.
    Ready {
        /// The acquired image.
        image: ImageRef,
        /// Formatted, non-empty address.
        address: String,
    },
}

impl CaptureState {
    /// Short name of the state, for logs and status output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ImageAcquired { .. } => "image_acquired",
            Self::LocationAcquired { .. } => "location_acquired",
            Self::AddressResolved { .. } => "address_resolved",
            Self::Ready { .. } => "ready",
        }
    }

    /// The held image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Idle => None,
            Self::ImageAcquired { image }
            | Self::LocationAcquired { image, .. }
            | Self::AddressResolved { image, .. }
            | Self::Ready { image, .. } => Some(image),
        }
    }

    /// The formatted address, once the flow is ready.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Ready { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Check whether the capture is complete enough to submit.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Drives the capture sequence over a set of device services.
#[derive(Debug)]
pub struct CaptureFlow<P, L, G> {
    picker: P,
    locator: L,
    geocoder: G,
    accuracy: Accuracy,
    state: CaptureState,
}

impl<P, L, G> CaptureFlow<P, L, G>
where
    P: ImagePicker,
    L: LocationProvider,
    G: Geocoder,
{
    /// Create an idle flow.
    #[must_use]
    pub fn new(picker: P, locator: L, geocoder: G) -> Self {
        Self {
            picker,
            locator,
            geocoder,
            accuracy: Accuracy::High,
            state: CaptureState::Idle,
        }
    }

    /// Use a different location accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Drop everything captured so far.
    pub fn reset(&mut self) {
        debug!("Capture flow reset from {}", self.state.name());
        self.state = CaptureState::Idle;
    }

    /// Acquire an image and, if one was obtained, chain into location and
    /// address resolution.
    ///
    /// A cancelled pick leaves the state untouched and is not an error.
    ///
    /// # Errors
    ///
    /// Returns the first permission or device error hit along the chain.
    pub async fn capture(&mut self, source: ImageSource) -> Result<()> {
        if self.acquire_image(source).await? {
            self.resolve_location().await?;
        }
        Ok(())
    }

    /// Acquire an image from `source`.
    ///
    /// Returns `false` if the user cancelled. A new image discards any
    /// previously resolved location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if access is refused, or the
    /// picker's own error.
    pub async fn acquire_image(&mut self, source: ImageSource) -> Result<bool> {
        let status = self.picker.request_permission(source).await?;
        if !status.is_granted() {
            warn!("{source} permission denied");
            return Err(Error::permission_denied(source.permission()));
        }

        match self.picker.pick(source).await? {
            Some(image) => {
                info!("Acquired image {image} from {source}");
                self.state = CaptureState::ImageAcquired { image };
                Ok(true)
            }
            None => {
                debug!("Image {source} pick cancelled");
                Ok(false)
            }
        }
    }

    /// Fix the device position and reverse-geocode it for the held image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteCapture`] if no image is held,
    /// [`Error::PermissionDenied`] if location access is refused, and
    /// [`Error::DeviceUnavailable`] if no address can be resolved.
    pub async fn resolve_location(&mut self) -> Result<()> {
        let image = self.state.image().cloned().ok_or(Error::IncompleteCapture)?;
        self.state = CaptureState::ImageAcquired {
            image: image.clone(),
        };

        let status = self.locator.request_permission().await?;
        if !status.is_granted() {
            warn!("Location permission denied");
            return Err(Error::permission_denied(Permission::Location));
        }

        let position = self.locator.current_position(self.accuracy).await?;
        debug!(
            "Position fix at {:.5}, {:.5}",
            position.latitude, position.longitude
        );
        self.state = CaptureState::LocationAcquired {
            image: image.clone(),
            position,
        };

        let Some(address) = self.geocoder.reverse_geocode(position).await?.into_iter().next()
        else {
            warn!("Geocoder returned no results");
            return Err(Error::device_unavailable(
                "no address found for the current location",
            ));
        };

        let formatted = address.format();
        self.state = CaptureState::AddressResolved {
            image: image.clone(),
            position,
            address,
        };

        if formatted.is_empty() {
            warn!("Geocoder result has no usable components");
            return Err(Error::device_unavailable(
                "no address found for the current location",
            ));
        }

        info!("Resolved address: {formatted}");
        self.state = CaptureState::Ready {
            image,
            address: formatted,
        };
        Ok(())
    }
}

/// Scriptable device services for tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone)]
    pub(crate) struct ScriptedPicker {
        pub(crate) permission: PermissionStatus,
        pub(crate) image: Option<&'static str>,
    }

    impl ScriptedPicker {
        pub(crate) fn returning(uri: &'static str) -> Self {
            Self {
                permission: PermissionStatus::Granted,
                image: Some(uri),
            }
        }
    }

    #[async_trait]
    impl ImagePicker for ScriptedPicker {
        async fn request_permission(&self, _source: ImageSource) -> Result<PermissionStatus> {
            Ok(self.permission)
        }

        async fn pick(&self, _source: ImageSource) -> Result<Option<ImageRef>> {
            Ok(self.image.map(ImageRef::new))
        }
    }

    #[derive(Debug, Clone)]
    pub(crate) struct ScriptedLocator {
        pub(crate) permission: PermissionStatus,
        pub(crate) position: Option<Position>,
    }

    impl ScriptedLocator {
        pub(crate) fn at(latitude: f64, longitude: f64) -> Self {
            Self {
                permission: PermissionStatus::Granted,
                position: Some(Position::new(latitude, longitude)),
            }
        }
    }

    #[async_trait]
    impl LocationProvider for ScriptedLocator {
        async fn request_permission(&self) -> Result<PermissionStatus> {
            Ok(self.permission)
        }

        async fn current_position(&self, _accuracy: Accuracy) -> Result<Position> {
            self.position
                .ok_or_else(|| Error::device_unavailable("no location fix"))
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct ScriptedGeocoder {
        pub(crate) results: Vec<GeocodedAddress>,
    }

    impl ScriptedGeocoder {
        pub(crate) fn paris() -> Self {
            Self {
                results: vec![GeocodedAddress {
                    street: Some("5 Ave".to_string()),
                    city: Some("Paris".to_string()),
                    region: None,
                    country: Some("France".to_string()),
                }],
            }
        }
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        async fn reverse_geocode(&self, _position: Position) -> Result<Vec<GeocodedAddress>> {
            Ok(self.results.clone())
        }
    }
}
