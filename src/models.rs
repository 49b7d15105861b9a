use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::AppError;

// ============ Inbound Models ============

/// Form fields submitted to `POST /getAddressDetails`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressForm {
    /// Free-text postal address.
    pub address: String,
    /// Requested output format, expected `json` or `xml`.
    pub type_format: String,
}

/// A single geocoding request.
///
/// The format stays a raw string: unsupported values are only rejected after
/// the provider has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub address: String,
    pub output_format: String,
}

impl From<AddressForm> for GeocodeQuery {
    fn from(form: AddressForm) -> Self {
        Self {
            address: form.address,
            output_format: form.type_format,
        }
    }
}

/// Output representations the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(AppError::UnsupportedFormat),
        }
    }
}

// ============ Result Models ============

/// Latitude/longitude pair, serialized with the provider's key names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

/// The canonical result both output formats are rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    #[serde(rename = "address")]
    pub formatted_address: String,
}

/// A successful resolution together with the format it must be rendered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub format: OutputFormat,
    pub location: ResolvedLocation,
    /// Provider's own `lat`/`lng` text, when the provider answered in XML.
    pub coordinate_text: Option<CoordinateText>,
}

/// Coordinate leaves exactly as the provider wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateText {
    pub lat: String,
    pub lng: String,
}

impl Resolved {
    /// Serializes the location into the requested document.
    ///
    /// Building the document counts as part of handling the provider
    /// response, so failures surface as [`AppError::Parse`].
    pub fn render(&self) -> Result<ResponseBody, AppError> {
        match self.format {
            OutputFormat::Json => Ok(ResponseBody {
                content_type: "application/json",
                body: render_json(&self.location)?,
            }),
            OutputFormat::Xml => Ok(ResponseBody {
                content_type: "application/xml",
                body: render_xml(&self.location, self.coordinate_text.as_ref())?,
            }),
        }
    }
}

/// Rendered document ready to be sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl IntoResponse for ResponseBody {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Pretty JSON with 4-space indentation, `coordinates` before `address`.
pub fn render_json(location: &ResolvedLocation) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    location
        .serialize(&mut serializer)
        .map_err(|e| AppError::Parse(e.to_string()))?;
    Ok(buf)
}

/// `<root><address/><cordinates><lat/><lng/></cordinates></root>` behind an XML declaration.
///
/// Coordinates are copied from `text` when given, otherwise printed from the numbers.
pub fn render_xml(
    location: &ResolvedLocation,
    text: Option<&CoordinateText>,
) -> Result<Vec<u8>, AppError> {
    let mut writer = Writer::new(Vec::new());
    let (lat, lng) = match text {
        Some(text) => (text.lat.clone(), text.lng.clone()),
        None => (
            location.coordinates.latitude.to_string(),
            location.coordinates.longitude.to_string(),
        ),
    };

    let events = [
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        Event::Start(BytesStart::new("root")),
        Event::Start(BytesStart::new("address")),
        Event::Text(BytesText::new(&location.formatted_address)),
        Event::End(BytesEnd::new("address")),
        Event::Start(BytesStart::new("cordinates")),
        Event::Start(BytesStart::new("lat")),
        Event::Text(BytesText::new(&lat)),
        Event::End(BytesEnd::new("lat")),
        Event::Start(BytesStart::new("lng")),
        Event::Text(BytesText::new(&lng)),
        Event::End(BytesEnd::new("lng")),
        Event::End(BytesEnd::new("cordinates")),
        Event::End(BytesEnd::new("root")),
    ];

    for event in events {
        writer
            .write_event(event)
            .map_err(|e| AppError::Parse(format!("failed to build XML document: {}", e)))?;
    }

    Ok(writer.into_inner())
}

// ============ Provider Wire Models ============

/// JSON body returned by the provider's `/json` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderJsonResponse {
    pub results: Vec<ProviderResult>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResult {
    pub formatted_address: String,
    pub geometry: ProviderGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderGeometry {
    pub location: ProviderLatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProviderLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn googleplex() -> ResolvedLocation {
        ResolvedLocation {
            coordinates: Coordinates {
                latitude: 37.4224764,
                longitude: -122.0842499,
            },
            formatted_address: "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA".to_string(),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("xml".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert!(matches!(
            "JSON".parse::<OutputFormat>(),
            Err(AppError::UnsupportedFormat)
        ));
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(AppError::UnsupportedFormat)
        ));
        assert_eq!(OutputFormat::Xml.as_str(), "xml");
    }

    #[test]
    fn test_render_json_layout() {
        let body = String::from_utf8(render_json(&googleplex()).unwrap()).unwrap();
        let expected = r#"{
    "coordinates": {
        "lat": 37.4224764,
        "lng": -122.0842499
    },
    "address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA"
}"#;
        assert_eq!(body, expected);
    }

    #[test]
    fn test_render_xml_layout() {
        let location = ResolvedLocation {
            coordinates: Coordinates {
                latitude: 1.5,
                longitude: -2.25,
            },
            formatted_address: "Fish & Chips <Shop>".to_string(),
        };
        let body = String::from_utf8(render_xml(&location, None).unwrap()).unwrap();
        assert_eq!(
            body,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <root><address>Fish &amp; Chips &lt;Shop&gt;</address>\
             <cordinates><lat>1.5</lat><lng>-2.25</lng></cordinates></root>"
        );
    }

    #[test]
    fn test_render_sets_content_type() {
        let resolved = Resolved {
            format: OutputFormat::Xml,
            location: googleplex(),
            coordinate_text: None,
        };
        assert_eq!(resolved.render().unwrap().content_type, "application/xml");

        let resolved = Resolved {
            format: OutputFormat::Json,
            location: googleplex(),
            coordinate_text: None,
        };
        assert_eq!(resolved.render().unwrap().content_type, "application/json");
    }

    #[test]
    fn test_render_xml_copies_provider_text() {
        let resolved = Resolved {
            format: OutputFormat::Xml,
            location: googleplex(),
            coordinate_text: Some(CoordinateText {
                lat: "37.4224760".to_string(),
                lng: "-122.0842499".to_string(),
            }),
        };
        let body = String::from_utf8(resolved.render().unwrap().body).unwrap();
        assert!(body.contains("<lat>37.4224760</lat><lng>-122.0842499</lng>"));
    }

    #[test]
    fn test_query_from_form() {
        let query = GeocodeQuery::from(AddressForm {
            address: "221B Baker Street".to_string(),
            type_format: "xml".to_string(),
        });
        assert_eq!(query.address, "221B Baker Street");
        assert_eq!(query.output_format, "xml");
    }
}
