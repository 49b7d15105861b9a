//! Address resolution: one provider call, then translation into the
//! caller's requested format.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::AppError;
use crate::geocoding_client::GeocodingClient;
use crate::models::{
    CoordinateText, Coordinates, GeocodeQuery, OutputFormat, ProviderJsonResponse, Resolved,
    ResolvedLocation,
};

/// Turns a [`GeocodeQuery`] into a [`Resolved`] location or an [`AppError`].
#[derive(Clone)]
pub struct Resolver {
    client: GeocodingClient,
}

impl Resolver {
    pub fn new(client: GeocodingClient) -> Self {
        Self { client }
    }

    /// Resolves a single query.
    ///
    /// Flow:
    /// 1. Call the provider with the raw format as path segment.
    /// 2. Anything outside 2xx is `AppError::Provider`, whatever the body says.
    /// 3. Only then is the format checked: `json` and `xml` are parsed, any
    ///    other value is `AppError::UnsupportedFormat`.
    pub async fn resolve(&self, query: &GeocodeQuery) -> Result<Resolved, AppError> {
        let reply = self
            .client
            .fetch(&query.output_format, &query.address)
            .await?;

        if !reply.status.is_success() {
            return Err(AppError::Provider(reply.status));
        }

        let format: OutputFormat = query.output_format.parse()?;
        let (location, coordinate_text) = match format {
            OutputFormat::Json => (parse_json_body(&reply.body)?, None),
            OutputFormat::Xml => {
                let (location, text) = parse_xml_document(&reply.body)?;
                (location, Some(text))
            }
        };

        tracing::info!(
            "Resolved '{}' to ({}, {})",
            location.formatted_address,
            location.coordinates.latitude,
            location.coordinates.longitude
        );

        Ok(Resolved {
            format,
            location,
            coordinate_text,
        })
    }
}

/// Extracts the first result from a provider JSON body.
pub fn parse_json_body(body: &str) -> Result<ResolvedLocation, AppError> {
    let response: ProviderJsonResponse =
        serde_json::from_str(body).map_err(|e| AppError::Parse(e.to_string()))?;

    let first = response.results.into_iter().next().ok_or_else(|| {
        AppError::Parse(format!(
            "results list is empty (provider status: {})",
            response.status.as_deref().unwrap_or("unknown")
        ))
    })?;

    Ok(ResolvedLocation {
        coordinates: Coordinates {
            latitude: first.geometry.location.lat,
            longitude: first.geometry.location.lng,
        },
        formatted_address: first.formatted_address,
    })
}

/// Extracts the first `formatted_address`, `lat` and `lng` elements found
/// anywhere in a provider XML body.
pub fn parse_xml_body(body: &str) -> Result<ResolvedLocation, AppError> {
    parse_xml_document(body).map(|(location, _)| location)
}

/// Like [`parse_xml_body`], also returning the coordinate text as the
/// provider wrote it.
///
/// Each leaf is bound to its first occurrence, even when that element is
/// empty or self-closing; text and CDATA are collected up to its end tag.
pub fn parse_xml_document(body: &str) -> Result<(ResolvedLocation, CoordinateText), AppError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    // formatted_address, lat, lng
    let mut leaves: [Option<String>; 3] = [None, None, None];
    let mut capturing: Option<(usize, usize)> = None;
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                if capturing.is_none() {
                    if let Some(slot) = leaf_slot(e.name().as_ref()) {
                        if leaves[slot].is_none() {
                            leaves[slot] = Some(String::new());
                            capturing = Some((slot, depth));
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if capturing.is_none() {
                    if let Some(slot) = leaf_slot(e.name().as_ref()) {
                        leaves[slot].get_or_insert_with(String::new);
                    }
                }
            }
            Ok(Event::End(_)) => {
                if matches!(capturing, Some((_, d)) if d == depth) {
                    capturing = None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(text)) => {
                if let Some((slot, _)) = capturing {
                    let value = text
                        .unescape()
                        .map_err(|e| AppError::Parse(e.to_string()))?;
                    leaves[slot].get_or_insert_with(String::new).push_str(&value);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some((slot, _)) = capturing {
                    let value = std::str::from_utf8(&data)
                        .map_err(|e| AppError::Parse(format!("invalid CDATA: {}", e)))?;
                    leaves[slot].get_or_insert_with(String::new).push_str(value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Parse(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    let [formatted_address, lat, lng] = leaves;
    let formatted_address = formatted_address
        .ok_or_else(|| AppError::Parse("no <formatted_address> element".to_string()))?;
    let (latitude, lat_text) = parse_coordinate("lat", lat)?;
    let (longitude, lng_text) = parse_coordinate("lng", lng)?;

    Ok((
        ResolvedLocation {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            formatted_address,
        },
        CoordinateText {
            lat: lat_text,
            lng: lng_text,
        },
    ))
}

fn leaf_slot(name: &[u8]) -> Option<usize> {
    match name {
        b"formatted_address" => Some(0),
        b"lat" => Some(1),
        b"lng" => Some(2),
        _ => None,
    }
}

fn parse_coordinate(name: &str, raw: Option<String>) -> Result<(f64, String), AppError> {
    let raw = raw.ok_or_else(|| AppError::Parse(format!("no <{}> element", name)))?;
    let text = raw.trim();
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| (value, text.to_string()))
        .ok_or_else(|| AppError::Parse(format!("<{}> is not a finite number: '{}'", name, raw)))
}
