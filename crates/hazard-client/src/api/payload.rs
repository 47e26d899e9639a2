//! Multipart report payload.

use hazard_domain::{ImageAttachment, Position, ReportDraft, ValidationError};

/// Check a draft in the fixed order: description first, then location
pub fn validate_draft(draft: &ReportDraft) -> Result<Position, ValidationError> {
    if draft.description.is_empty() {
        return Err(ValidationError::DescriptionRequired);
    }
    draft.position.ok_or(ValidationError::LocationRequired)
}

/// Decimal form of a stored coordinate. Rust's float formatting is the
/// shortest string that parses back to the same `f64`.
pub fn format_coordinate(value: f64) -> String {
    value.to_string()
}

/// Report ready for the create endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPayload {
    pub description: String,
    pub position: Position,
    pub image: Option<ImageAttachment>,
}

impl ReportPayload {
    pub fn from_draft(draft: &ReportDraft) -> Result<Self, ValidationError> {
        let position = validate_draft(draft)?;
        Ok(Self {
            description: draft.description.clone(),
            position,
            image: draft.image.clone(),
        })
    }

    /// Text parts in wire order: `description`, `latitude`, `longitude`
    pub fn text_fields(&self) -> [(&'static str, String); 3] {
        [
            ("description", self.description.clone()),
            ("latitude", format_coordinate(self.position.lat)),
            ("longitude", format_coordinate(self.position.lng)),
        ]
    }

    pub const IMAGE_FIELD: &'static str = "image";
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::lorem::en::Sentence;

    fn draft(description: &str, position: Option<Position>) -> ReportDraft {
        ReportDraft {
            description: description.to_string(),
            image: None,
            position,
        }
    }

    #[test]
    fn test_description_checked_before_location() {
        assert_eq!(
            validate_draft(&draft("", None)),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            validate_draft(&draft("", Some(Position::new(1.0, 2.0)))),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            validate_draft(&draft("pothole", None)),
            Err(ValidationError::LocationRequired)
        );
    }

    #[test]
    fn test_coordinates_parse_back_exactly() {
        for _ in 0..200 {
            let lat: f64 = (-90.0_f64..90.0).fake();
            let lng: f64 = (-180.0_f64..180.0).fake();
            let description: String = Sentence(3..8).fake();
            let payload =
                ReportPayload::from_draft(&draft(&description, Some(Position::new(lat, lng))))
                    .unwrap();

            let [(_, desc), (lat_name, lat_text), (lng_name, lng_text)] = payload.text_fields();
            assert_eq!(desc, description);
            assert_eq!(lat_name, "latitude");
            assert_eq!(lng_name, "longitude");
            assert_eq!(lat_text.parse::<f64>().unwrap().to_bits(), lat.to_bits());
            assert_eq!(lng_text.parse::<f64>().unwrap().to_bits(), lng.to_bits());
        }
    }

    #[test]
    fn test_plain_decimal_strings() {
        assert_eq!(format_coordinate(23.68), "23.68");
        assert_eq!(format_coordinate(-86.96), "-86.96");
        assert_eq!(format_coordinate(0.0000001), "0.0000001");
    }

    #[test]
    fn test_image_carried_over() {
        let mut d = draft("Broken streetlight", Some(Position::new(23.7, 86.9)));
        d.image = Some(ImageAttachment::new("light.jpg", "image/jpeg", vec![0xFF, 0xD8]));
        let payload = ReportPayload::from_draft(&d).unwrap();
        assert_eq!(payload.image.as_ref().map(ImageAttachment::len), Some(2));
    }
}
