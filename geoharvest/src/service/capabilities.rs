use log::info;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::HarvestError;
use crate::service::http::HttpClient;
use crate::service::WfsEndpoint;

/// Namespace of the WFS 2.0 capabilities document.
pub const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs/2.0";

/// Requests `GetCapabilities` from the service and returns names of all available layers in document order.
pub fn list_layers(
    client: &impl HttpClient,
    endpoint: &WfsEndpoint,
) -> Result<Vec<String>, HarvestError> {
    let url = endpoint.request_url(&[("REQUEST", "GetCapabilities"), ("SERVICE", "WFS")]);
    let response = client.get(&url)?;
    if !response.is_ok() {
        return Err(HarvestError::Transport(format!(
            "GetCapabilities request to {endpoint} returned HTTP {}",
            response.status
        )));
    }

    let layers = parse_capabilities(&response.body)?;
    for name in &layers {
        info!("layername: {name}");
    }

    Ok(layers)
}

/// Extracts the `Name` of every WFS 2.0 `FeatureType` element of a capabilities document.
pub fn parse_capabilities(xml: &[u8]) -> Result<Vec<String>, HarvestError> {
    let text = std::str::from_utf8(xml)
        .map_err(|err| HarvestError::Parse(format!("capabilities are not valid UTF-8: {err}")))?;
    let mut reader = NsReader::from_str(text);
    reader.trim_text(true);

    let mut names = vec![];
    let mut depth = 0usize;
    let mut has_root = false;
    let mut feature_type_depth = None;
    let mut name_depth = None;
    let mut current_name: Option<String> = None;

    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(element)) => {
                if depth == 0 && has_root {
                    return Err(second_root());
                }

                depth += 1;
                has_root = true;

                if !is_wfs(&ns) {
                    continue;
                }

                match element.local_name().as_ref() {
                    b"FeatureType" if feature_type_depth.is_none() => {
                        feature_type_depth = Some(depth);
                        current_name = None;
                    }
                    b"Name" if feature_type_depth == Some(depth - 1) => {
                        name_depth = Some(depth);
                        current_name = Some(String::new());
                    }
                    _ => {}
                }
            }
            (_, Event::Empty(_)) => {
                if depth == 0 && has_root {
                    return Err(second_root());
                }

                has_root = true;
            }
            (_, Event::Text(text)) if name_depth.is_some() => {
                if let Some(name) = current_name.as_mut() {
                    name.push_str(&text.unescape()?);
                }
            }
            (_, Event::CData(data)) if name_depth.is_some() => {
                if let Some(name) = current_name.as_mut() {
                    let text = std::str::from_utf8(&data)
                        .map_err(|err| HarvestError::Parse(format!("invalid CDATA: {err}")))?;
                    name.push_str(text);
                }
            }
            (_, Event::End(_)) => {
                if depth == 0 {
                    return Err(HarvestError::Parse("unexpected closing tag".into()));
                }

                if name_depth == Some(depth) {
                    name_depth = None;
                } else if feature_type_depth == Some(depth) {
                    feature_type_depth = None;
                    match current_name.take() {
                        Some(name) if !name.is_empty() => names.push(name),
                        _ => {
                            return Err(HarvestError::Parse(
                                "FeatureType element without a name".into(),
                            ))
                        }
                    }
                }

                depth -= 1;
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    if !has_root {
        return Err(HarvestError::Parse(
            "capabilities document has no root element".into(),
        ));
    }

    if depth != 0 {
        return Err(HarvestError::Parse(
            "capabilities document is truncated".into(),
        ));
    }

    Ok(names)
}

fn second_root() -> HarvestError {
    HarvestError::Parse("capabilities document has more than one root element".into())
}

fn is_wfs(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(ns)) if *ns == WFS_NAMESPACE.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::http::HttpResponse;
    use crate::tests::ScriptedHttpClient;
    use assert_matches::assert_matches;

    const CAPABILITIES: &str = include_str!("../../test-data/capabilities.xml");

    #[test]
    fn parse_fixture() {
        let names = parse_capabilities(CAPABILITIES.as_bytes()).unwrap();
        assert_eq!(names, ["stadsdeel", "buurt", "buurtcombinatie"]);
    }

    #[test]
    fn list_layers_sends_get_capabilities() {
        let client = ScriptedHttpClient::new([Ok(HttpResponse::new(200, CAPABILITIES))]);
        let endpoint = WfsEndpoint::new("https://map.data.amsterdam.nl/maps/gebieden").unwrap();

        let names = list_layers(&client, &endpoint).unwrap();
        assert_eq!(names, ["stadsdeel", "buurt", "buurtcombinatie"]);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].as_str(),
            "https://map.data.amsterdam.nl/maps/gebieden?REQUEST=GetCapabilities&SERVICE=WFS"
        );
    }

    #[test]
    fn other_namespaces_are_ignored() {
        let xml = r#"<?xml version="1.0"?>
            <wfs:WFS_Capabilities xmlns:wfs="http://www.opengis.net/wfs/2.0"
                                  xmlns:old="http://www.opengis.net/wfs">
              <wfs:FeatureTypeList>
                <old:FeatureType><old:Name>legacy</old:Name></old:FeatureType>
                <wfs:FeatureType>
                  <wfs:Title>Buurten</wfs:Title>
                  <wfs:Name>buurt</wfs:Name>
                </wfs:FeatureType>
              </wfs:FeatureTypeList>
            </wfs:WFS_Capabilities>"#;

        assert_eq!(parse_capabilities(xml.as_bytes()).unwrap(), ["buurt"]);
    }

    #[test]
    fn escaped_names() {
        let xml = r#"<WFS_Capabilities xmlns="http://www.opengis.net/wfs/2.0">
              <FeatureTypeList>
                <FeatureType><Name>a&amp;b</Name></FeatureType>
              </FeatureTypeList>
            </WFS_Capabilities>"#;

        assert_eq!(parse_capabilities(xml.as_bytes()).unwrap(), ["a&b"]);
    }

    #[test]
    fn cdata_names() {
        let xml = r#"<WFS_Capabilities xmlns="http://www.opengis.net/wfs/2.0">
              <FeatureTypeList>
                <FeatureType><Name><![CDATA[buurt]]></Name></FeatureType>
                <FeatureType><Name>stads<![CDATA[deel]]></Name></FeatureType>
              </FeatureTypeList>
            </WFS_Capabilities>"#;

        assert_eq!(
            parse_capabilities(xml.as_bytes()).unwrap(),
            ["buurt", "stadsdeel"]
        );
    }

    #[test]
    fn several_root_elements() {
        assert_matches!(parse_capabilities(b"<a/><b/>"), Err(HarvestError::Parse(_)));
        assert_matches!(
            parse_capabilities(b"<a></a><b></b>"),
            Err(HarvestError::Parse(_))
        );
    }

    #[test]
    fn empty_list() {
        let xml = r#"<WFS_Capabilities xmlns="http://www.opengis.net/wfs/2.0"/>"#;
        assert!(parse_capabilities(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_documents() {
        assert_matches!(
            parse_capabilities(b"Service Unavailable"),
            Err(HarvestError::Parse(_))
        );
        assert_matches!(parse_capabilities(b""), Err(HarvestError::Parse(_)));
        assert_matches!(
            parse_capabilities(b"<WFS_Capabilities><FeatureTypeList>"),
            Err(HarvestError::Parse(_))
        );
        assert_matches!(
            parse_capabilities(b"<a><b></a></b>"),
            Err(HarvestError::Parse(_))
        );
        assert_matches!(
            parse_capabilities(&[0x3c, 0xff, 0xfe, 0x3e]),
            Err(HarvestError::Parse(_))
        );
    }

    #[test]
    fn http_failure_is_transport_error() {
        let client = ScriptedHttpClient::new([Ok(HttpResponse::new(503, ""))]);
        let endpoint = WfsEndpoint::new("https://example.com/wfs").unwrap();
        assert_matches!(
            list_layers(&client, &endpoint),
            Err(HarvestError::Transport(_))
        );

        let client = ScriptedHttpClient::new([Err(HarvestError::Transport("refused".into()))]);
        assert_matches!(
            list_layers(&client, &endpoint),
            Err(HarvestError::Transport(_))
        );
    }
}
