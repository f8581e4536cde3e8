//! One-shot geolocation capability. The core issues exactly one
//! `GetPosition` request at startup; retry policy belongs to the shell.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationOperation {
    GetPosition,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Position {}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("location request timed out")]
    Timeout,
}

impl LocationError {
    #[must_use]
    pub fn user_facing_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access is required. Please enable location permissions and reload."
            }
            Self::Unavailable { .. } | Self::Timeout => {
                "Unable to determine your location. Please check your settings and reload."
            }
        }
    }
}

pub type LocationResult = Result<Position, LocationError>;

impl Operation for LocationOperation {
    type Output = LocationResult;
}

pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn get_position<F>(&self, make_event: F)
    where
        F: Fn(LocationResult) -> Ev + Send + Sync + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(LocationOperation::GetPosition).await;
            ctx.update_app(make_event(result));
        });
    }
}
