//! Position-quality derivation for one publish session.
//!
//! A session starts with whatever fix the location subsystem had cached
//! from earlier (possibly nothing) and may then receive fresh fixes. The
//! quality attached to a listing depends on which of those is available.

use crate::types::{Position, PositionQuality};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub position: Position,
    pub quality: PositionQuality,
}

#[derive(Debug, Clone, Default)]
pub struct LocationSession {
    current: Option<Position>,
    // Set by the first fix of this session, cleared when updates stop
    fresh: bool,
}

impl LocationSession {
    /// Start tracking. `cached` is the last fix known before this session,
    /// `None` when location is unavailable or not permitted.
    pub fn start(cached: Option<Position>) -> Self {
        Self {
            current: cached,
            fresh: false,
        }
    }

    pub fn record_fix(&mut self, position: Position) {
        tracing::debug!(lon = position.lon, lat = position.lat, "New position fix");
        self.current = Some(position);
        self.fresh = true;
    }

    /// Stop location updates. The last fix is kept but is no longer fresh.
    pub fn stop(&mut self) {
        self.fresh = false;
    }

    pub fn latest(&self) -> Option<Position> {
        self.current
    }

    pub fn has_fresh_fix(&self) -> bool {
        self.fresh
    }

    pub fn resolve(&self) -> ResolvedPosition {
        match self.current {
            None => ResolvedPosition {
                position: Position::ORIGIN,
                quality: PositionQuality::NotKnown,
            },
            Some(position) if self.fresh => ResolvedPosition {
                position,
                quality: PositionQuality::Known,
            },
            Some(position) => ResolvedPosition {
                position,
                quality: PositionQuality::LastKnown,
            },
        }
    }
}
