use crate::models::GeoPoint;

/// Marker placement for officials drawing a new project route.
///
/// First click sets the start, second sets the end and asks for a route,
/// a third click starts over from the clicked point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePicker {
    start: Option<GeoPoint>,
    end: Option<GeoPoint>,
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerEvent {
    StartSet(GeoPoint),
    /// Both markers placed; the caller should fetch a route for this pair
    RouteReady { start: GeoPoint, end: GeoPoint },
    /// Start moved to the click, end and route cleared
    Reset(GeoPoint),
}

impl PickerEvent {
    pub fn status_message(&self) -> &'static str {
        match self {
            PickerEvent::StartSet(_) => "Start set. Click end point.",
            PickerEvent::RouteReady { .. } => "End set. Route generated.",
            PickerEvent::Reset(_) => "Resetting... Click end point.",
        }
    }
}

impl RoutePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-filled markers, as when reopening a saved project
    pub fn with_points(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn start(&self) -> Option<GeoPoint> {
        self.start
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.end
    }

    pub fn initial_message() -> &'static str {
        "Click map to set start point"
    }

    pub fn click(&mut self, at: GeoPoint) -> PickerEvent {
        match (self.start, self.end) {
            (None, _) => {
                self.start = Some(at);
                PickerEvent::StartSet(at)
            }
            (Some(start), None) => {
                self.end = Some(at);
                PickerEvent::RouteReady { start, end: at }
            }
            (Some(_), Some(_)) => {
                self.start = Some(at);
                self.end = None;
                PickerEvent::Reset(at)
            }
        }
    }
}
