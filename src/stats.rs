use serde::Serialize;

/// Per-agency counters reported in `log.txt` and the stats table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub routes: usize,
    pub stops: usize,
}

impl RunStats {
    /// Adds the deduplicated stop count of one emitted route.
    pub fn add_route_stops(&mut self, stop_count: usize) {
        self.stops += stop_count;
    }

    /// Records the size of the final route set.
    pub fn add_routes(&mut self, route_count: usize) {
        self.routes += route_count;
    }

    /// Average number of stops per emitted route.
    pub fn stops_per_route(&self) -> f64 {
        if self.routes == 0 {
            0.0
        } else {
            self.stops as f64 / self.routes as f64
        }
    }
}
