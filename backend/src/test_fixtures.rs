//! Record builders shared by unit tests.

use crate::models::coordinates::{classify, PlaceholderLocation, RawCoordinates};
use crate::models::record::Record;
use crate::models::time::{parse_occurred, parse_reported};

pub(crate) struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub(crate) fn new(shape: &str, country: &str) -> Self {
        Self {
            record: Record {
                occurred: None,
                reported: None,
                shape: shape.to_string(),
                country: country.to_string(),
                state: None,
                city: None,
                coordinates: RawCoordinates::default(),
                quality: crate::models::CoordinateQuality::Invalid,
                point: None,
                has_image: false,
                summary: String::new(),
                explanation: None,
            },
        }
    }

    pub(crate) fn occurred(mut self, value: &str) -> Self {
        self.record.occurred = parse_occurred(value);
        self
    }

    pub(crate) fn reported(mut self, value: &str) -> Self {
        self.record.reported = parse_reported(value);
        self
    }

    pub(crate) fn state(mut self, value: &str) -> Self {
        self.record.state = Some(value.to_string());
        self
    }

    pub(crate) fn city(mut self, value: &str) -> Self {
        self.record.city = Some(value.to_string());
        self
    }

    pub(crate) fn coords(mut self, lat: &str, lon: &str) -> Self {
        let raw = RawCoordinates::new(Some(lat.to_string()), Some(lon.to_string()));
        let (quality, point) = classify(&raw, &PlaceholderLocation::default());
        self.record.coordinates = raw;
        self.record.quality = quality;
        self.record.point = point;
        self
    }

    pub(crate) fn image(mut self) -> Self {
        self.record.has_image = true;
        self
    }

    pub(crate) fn build(self) -> Record {
        self.record
    }
}

pub(crate) fn record(shape: &str, country: &str) -> RecordBuilder {
    RecordBuilder::new(shape, country)
}
