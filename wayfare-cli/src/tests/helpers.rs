//! Test helpers for writing CLI input documents into a temporary workspace.

use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Unscheduled day: a temple visit, then ramen reached after a 10 minute walk.
pub(super) const SAMPLE_ITINERARY: &str = r#"{
  "days": [{
    "id": "d1",
    "activities": [
      {"kind": "place", "id": "temple", "title": "Kiyomizu-dera", "durationMin": 90, "tags": ["temple"]},
      {"kind": "note", "id": "n1", "title": "Buy a goshuincho"},
      {"kind": "place", "id": "ramen", "title": "Ramen Shop", "locationId": "ramen", "durationMin": 45,
       "travelFromPrevious": {"mode": "walk", "durationMinutes": 10},
       "operatingWindow": {"opensAt": "11:00", "closesAt": "15:00"}}
    ]
  }]
}"#;

/// The same day with the ramen visit timed before opening.
pub(super) const EARLY_RAMEN_ITINERARY: &str = r#"{
  "days": [{
    "id": "d1",
    "activities": [
      {"kind": "place", "id": "temple", "title": "Kiyomizu-dera",
       "schedule": {"arrivalTime": "09:00", "departureTime": "10:30"}},
      {"kind": "place", "id": "ramen", "title": "Ramen Shop",
       "travelFromPrevious": {"mode": "walk", "durationMinutes": 10},
       "schedule": {"arrivalTime": "10:45", "departureTime": "11:30"},
       "operatingWindow": {"opensAt": "11:00", "closesAt": "15:00"}}
    ]
  }]
}"#;

/// Ramen opens on Mondays; the illumination only runs in early December.
pub(super) const SAMPLE_LOCATIONS: &str = r#"[
  {"id": "temple", "name": "Kiyomizu-dera", "category": "temple"},
  {"id": "ramen", "name": "Ramen Shop", "category": "restaurant",
   "hours": {"periods": [{"day": 1, "open": "11:00", "close": "15:00"}]}},
  {"id": "illumination", "name": "Arashiyama Hanatouro", "isSeasonal": true,
   "availabilityRules": [{"type": "fixed_annual", "monthStart": 12, "dayStart": 1,
                          "monthEnd": 12, "dayEnd": 25, "isAvailable": true}]}
]"#;

/// Temporary directory holding the documents a scenario writes.
#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write input document");
        path
    }
}
