/// Lifecycle of a cached contour.
///
/// Requested → Resident. Evicted contours leave the cache, so a new request
/// for their key starts over.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResidencyState {
    Requested,
    Resident,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Residency {
    pub state: ResidencyState,
}

impl Residency {
    pub fn new() -> Self {
        Self {
            state: ResidencyState::Requested,
        }
    }

    pub fn is_resident(&self) -> bool {
        self.state == ResidencyState::Resident
    }
}

impl Default for Residency {
    fn default() -> Self {
        Self::new()
    }
}
