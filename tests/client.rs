use bpay_client::{
    client::{BpayClient, DefaultBpayClient},
    models::{CustomerRegisterRequest, GroupCreateRequest, InvoiceCreateRequest},
    AddressQuery, AuthError, BillStatus, BpayError, ConstantData,
};
use chrono::{TimeDelta, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const LOGIN_PATH: &str = "/users/api/v1/user/oauth/token";

fn login_body(access_token: &str, expires_in: TimeDelta) -> Value {
    json!({
        "responseCode": true,
        "responseMsg": "",
        "data": {
            "tokenType": "Bearer",
            "accessToken": access_token,
            "refreshToken": "refresh",
            "expiresIn": (Utc::now() + expires_in).timestamp(),
            "userId": 11,
            "username": "merchant",
        }
    })
}

async fn mount_login(server: &MockServer, access_token: &str, expires_in: TimeDelta, times: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({ "username": "merchant", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(access_token, expires_in)))
        .expect(times)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> DefaultBpayClient {
    DefaultBpayClient::new(server.uri(), "merchant", "secret").unwrap()
}

fn regions() -> Value {
    json!([{ "id": 1, "name": "Ulaanbaatar" }, { "id": 2, "name": "Darkhan-Uul" }])
}

#[tokio::test]
async fn reuses_token_within_freshness_window() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.session().await.is_none());
    for _ in 0..3 {
        let regions = client.constant_aimag_hot().await.unwrap();
        assert_eq!(regions.len(), 2);
    }
    assert_eq!(client.session().await.unwrap().access_token, "token-1");
}

#[tokio::test]
async fn refreshes_token_inside_margin() {
    let server = MockServer::start().await;
    // Expires in an hour, so it's already within the 12 hour margin.
    mount_login(&server, "short-lived", TimeDelta::hours(1), 2).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .and(header("Authorization", "Bearer short-lived"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    client.constant_aimag_hot().await.unwrap();
    client.constant_aimag_hot().await.unwrap();
}

#[tokio::test]
async fn reauthentication_overwrites_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body("first", TimeDelta::hours(48))))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_login(&server, "second", TimeDelta::hours(48), 1).await;

    let client = client(&server);
    assert_eq!(client.authenticate().await.unwrap().access_token, "first");
    assert_eq!(client.authenticate().await.unwrap().access_token, "second");
    assert_eq!(client.session().await.unwrap().access_token, "second");
}

#[tokio::test]
async fn concurrent_calls_authenticate_once() {
    let server = MockServer::start().await;
    mount_login(&server, "shared", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .and(header("Authorization", "Bearer shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let (first, second) = tokio::join!(client.constant_aimag_hot(), client.constant_aimag_hot());
    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn gateway_failure_carries_response_message() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("POST"))
        .and(path("/payment/api/v1/customer/register"))
        .and(body_json(json!({ "userId": "u-1", "email": "u1@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseCode": false,
            "responseMsg": "duplicate customer",
            "data": "ignored",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CustomerRegisterRequest { user_id: "u-1".into(), email: "u1@example.com".into() };
    let error = client(&server).customer_register(&request).await.unwrap_err();
    assert!(error.is_gateway());
    assert_eq!(error.to_string(), "duplicate customer");
}

#[tokio::test]
async fn http_failure_keeps_cached_token() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/payment/api/v1/group/bills/9"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.constant_aimag_hot().await.unwrap();
    let before = client.session().await.unwrap();

    let error = client.group_bills("9", 7).await.unwrap_err();
    assert!(matches!(error, BpayError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
    assert!(!error.is_gateway());
    assert!(client.session().await.unwrap() == before);
}

#[tokio::test]
async fn login_failure_is_reported_with_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let error = client.constant_aimag_hot().await.unwrap_err();
    let BpayError::Auth(AuthError::Status { timestamp, status }) = &error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(*status, StatusCode::UNAUTHORIZED);
    assert_eq!(timestamp.len(), 14);
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    assert!(error.to_string().ends_with("-BPay auth response: 401 Unauthorized"));
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn group_create_without_data() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("POST"))
        .and(path("/payment/api/v1/group/create"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("userId", "7"))
        .and(body_json(json!({ "name": "Block A" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responseCode": true })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GroupCreateRequest { name: "Block A".into() };
    let response = client(&server).group_create(&request, 7).await.unwrap();
    assert!(response.status.response_code);
    assert_eq!(response.status.response_msg, "");
}

#[tokio::test]
async fn cascading_lookup_appends_path_segment() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/sumDuureg/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/bair/1/2/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 31, "name": "Bair 31" }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.constant_sum_duureg(5).await.unwrap().is_empty());
    let buildings = client.constant_bair(1, 2, 3).await.unwrap();
    assert_eq!(buildings, vec![ConstantData { id: 31, name: "Bair 31".into() }]);
}

#[tokio::test]
async fn constant_lookup_surfaces_decode_errors() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/khoroo/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responseCode": true })))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server).constant_bag_khoroo(1, 2).await.unwrap_err();
    assert!(matches!(error, BpayError::Decode(_)));
}

#[tokio::test]
async fn enveloped_operation_surfaces_decode_errors() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("POST"))
        .and(path("/payment/api/v1/invoice/create"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let request = InvoiceCreateRequest { bill_ids: vec![1, 2] };
    let error = client(&server).invoice_create(&request, 7).await.unwrap_err();
    assert!(matches!(error, BpayError::Decode(_)));
}

#[tokio::test]
async fn find_address_builds_query() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/search/api/v1/Search/FindAddress"))
        .and(query_param("AimagId", "1"))
        .and(query_param("SumId", "2"))
        .and(query_param("KhorooId", "3"))
        .and(query_param("BairNum", "14"))
        .and(query_param("XaalgaNum", "27"))
        .and(header("userId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseCode": true,
            "data": [{ "name": "Bat", "cid": "123", "address": "14-27", "count": 2 }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let address = AddressQuery { aimag_id: 1, sum_id: 2, khoroo_id: 3, bair_num: 14, haalga_num: 27 };
    let response = client(&server).find_address(&address, 7).await.unwrap();
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].cid, "123");
}

#[tokio::test]
async fn find_univision_hits_its_own_endpoint() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("GET"))
        .and(path("/search/api/v1/Search/FindUnivision"))
        .and(query_param("Custno", "C-77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseCode": true,
            "data": [{ "id": 5, "name": "Univision", "totalAmount": 25000.0, "providerId": 4, "bills": [] }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).find_univision("C-77", 7).await.unwrap();
    assert_eq!(response.data[0].provider_id, 4);
}

#[tokio::test]
async fn bill_check_reports_status() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("POST"))
        .and(path("/payment/api/v1/merchant/bill/check/INV-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseCode": true,
            "status": "PAID",
            "statusCode": 1001,
            "statusSystem": "qpay",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).bill_check("INV-1").await.unwrap();
    assert_eq!(response.status_code, Some(BillStatus::Paid));
    assert_eq!(response.status_system, "qpay");
}

#[tokio::test]
async fn login_refusal_surfaces_gateway_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseCode": false,
            "responseMsg": "invalid credentials",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/constant/Constant/aimaghot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regions()))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let error = client.constant_aimag_hot().await.unwrap_err();
    assert!(matches!(&error, BpayError::Auth(AuthError::Gateway(message)) if message == "invalid credentials"));
    assert!(error.to_string().ends_with("invalid credentials"));
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn call_without_customer_or_payload_sends_bare_request() {
    let server = MockServer::start().await;
    mount_login(&server, "token-1", TimeDelta::hours(48), 1).await;
    Mock::given(method("POST"))
        .and(path("/payment/api/v1/merchant/bill/check/X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responseCode": true, "status": "NEW" })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).bill_check("X").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let request = requests.iter().find(|request| request.url.path().ends_with("/bill/check/X")).unwrap();
    assert!(!request.headers.contains_key("userId"));
    assert!(request.body.is_empty());
    assert_eq!(request.headers.get("Authorization").unwrap(), "Bearer token-1");
    assert_eq!(request.headers.get("Content-Type").unwrap(), "application/json");
}

#[tokio::test]
async fn unreachable_gateway_fails_login_with_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = DefaultBpayClient::new(format!("http://127.0.0.1:{port}"), "merchant", "secret").unwrap();

    let error = client.constant_aimag_hot().await.unwrap_err();
    assert!(matches!(error, BpayError::Auth(AuthError::Http(_))));
    assert!(client.session().await.is_none());
}
