//! Integration tests for the geocoding and device location clients using
//! wiremock.

use std::sync::Arc;
use std::time::Duration;
use weather_places::geo::device::{DeviceLocation, DeviceLocationSource};
use weather_places::geo::ip_location::IpPositionProvider;
use weather_places::geo::kakao::KakaoGeocoder;
use weather_places::geo::GeocodingClient;
use weather_places::Error;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder(server: &MockServer) -> KakaoGeocoder {
    KakaoGeocoder::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
}

fn address_doc(name: &str, x: &str, y: &str) -> serde_json::Value {
    serde_json::json!({
        "address_name": name,
        "x": x,
        "y": y,
        "address": {
            "region_1depth_name": "서울",
            "region_2depth_name": "중구",
            "region_3depth_name": "태평로1가"
        },
        "road_address": null
    })
}

#[tokio::test]
async fn test_search_by_address_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .and(query_param("query", "서울"))
        .and(query_param("page", "1"))
        .and(query_param("size", "30"))
        .and(header("Authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "total_count": 2, "pageable_count": 2, "is_end": false },
            "documents": [
                address_doc("서울 중구 태평로1가", "126.97794", "37.56682"),
                address_doc("서울 중구 태평로2가", "126.97600", "37.56200"),
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let page = geocoder(&mock_server)
        .search_by_address("서울", 1, 30)
        .await
        .unwrap();

    assert_eq!(page.documents.len(), 2);
    assert!(!page.is_end);
    assert_eq!(page.total_count, 2);
    approx::assert_relative_eq!(page.documents[0].latitude, 37.56682);
    approx::assert_relative_eq!(page.documents[0].longitude, 126.97794);
    assert_eq!(page.documents[0].region_3, "태평로1가");
}

#[tokio::test]
async fn test_search_skips_documents_without_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "total_count": 2, "is_end": true },
            "documents": [
                address_doc("broken", "", ""),
                address_doc("서울 중구", "126.9", "37.5"),
            ]
        })))
        .mount(&mock_server)
        .await;

    let page = geocoder(&mock_server)
        .search_by_address("서울 중구", 1, 30)
        .await
        .unwrap();

    assert_eq!(page.documents.len(), 1);
    assert!(page.is_end);
}

#[tokio::test]
async fn test_search_error_message_from_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errorType": "MissingParameter",
            "message": "query parameter required"
        })))
        .mount(&mock_server)
        .await;

    let err = geocoder(&mock_server)
        .search_by_address("서울", 1, 30)
        .await
        .unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("query parameter required"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_unexpected_shape_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/address.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = geocoder(&mock_server)
        .search_by_address("서울", 1, 30)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = KakaoGeocoder::new("http://127.0.0.1:1", "k", Duration::from_secs(2)).unwrap();

    let err = client.search_by_address("서울", 1, 30).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(err.user_message(), "네트워크 오류가 발생했습니다.");
}

#[tokio::test]
async fn test_reverse_geocode_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2regioncode.json"))
        .and(query_param("x", "126.978"))
        .and(query_param("y", "37.5665"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "total_count": 2 },
            "documents": [
                {
                    "region_type": "B",
                    "address_name": "서울특별시 중구 태평로1가",
                    "region_1depth_name": "서울특별시",
                    "region_2depth_name": "중구",
                    "region_3depth_name": "태평로1가"
                },
                {
                    "region_type": "H",
                    "address_name": "서울특별시 중구 명동",
                    "region_1depth_name": "서울특별시",
                    "region_2depth_name": "중구",
                    "region_3depth_name": "명동"
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let regions = geocoder(&mock_server)
        .reverse_geocode(126.978, 37.5665)
        .await
        .unwrap();

    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].most_specific(), Some("태평로1가"));
}

async fn mount_ip_lookup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 35.1796,
            "lon": 129.0756
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_device_location_composes_address() {
    let mock_server = MockServer::start().await;
    mount_ip_lookup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2regioncode.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [{
                "address_name": "부산광역시 부산진구",
                "region_1depth_name": "부산광역시",
                "region_2depth_name": "부산진구",
                "region_3depth_name": ""
            }]
        })))
        .mount(&mock_server)
        .await;

    let provider = IpPositionProvider::new(true)
        .unwrap()
        .with_url(format!("{}/json", mock_server.uri()))
        .without_cache();
    let source = DeviceLocationSource::new(
        provider,
        Arc::new(geocoder(&mock_server)),
        Duration::from_secs(5),
    );

    let info = source.get_current_location().await.unwrap();
    approx::assert_relative_eq!(info.latitude, 35.1796);
    assert_eq!(info.address, "부산진구");
}

#[tokio::test]
async fn test_device_location_unknown_when_geocoding_fails() {
    let mock_server = MockServer::start().await;
    mount_ip_lookup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2regioncode.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = IpPositionProvider::new(true)
        .unwrap()
        .with_url(format!("{}/json", mock_server.uri()))
        .without_cache();
    let source = DeviceLocationSource::new(
        provider,
        Arc::new(geocoder(&mock_server)),
        Duration::from_secs(5),
    );

    let info = source.get_current_location().await.unwrap();
    assert_eq!(info.address, "알 수 없는 위치");
}

#[tokio::test]
async fn test_device_location_without_permission_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = IpPositionProvider::new(false)
        .unwrap()
        .with_url(format!("{}/json", mock_server.uri()))
        .without_cache();
    let source = DeviceLocationSource::new(
        provider,
        Arc::new(geocoder(&mock_server)),
        Duration::from_secs(5),
    );

    assert!(source.get_current_location().await.is_none());
}
