//! In-process stand-in for the GraphQL endpoint.

use rouille::{Response, Server};
use std::net::SocketAddr;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

/// Answers every POST whose JSON body carries a `stationItems` query with
/// the canned status and body. Anything else gets a 400.
pub struct MockGraphQl {
    addr: SocketAddr,
    stop: Option<(JoinHandle<()>, Sender<()>)>,
}

impl MockGraphQl {
    pub fn start(status: u16, body: &'static str) -> MockGraphQl {
        let server = Server::new("127.0.0.1:0", move |req| {
            if req.method() != "POST" {
                return Response::text("POST only").with_status_code(400);
            }
            let query: serde_json::Value = match rouille::input::json_input(req) {
                Ok(v) => v,
                Err(_) => return Response::text("expected JSON body").with_status_code(400),
            };
            let wants_station_items = query["query"]
                .as_str()
                .map(|q| q.contains("stationItems"))
                .unwrap_or(false);
            if !wants_station_items {
                return Response::text("unexpected query").with_status_code(400);
            }
            Response::from_data("application/json", body).with_status_code(status)
        })
        .expect("mock GraphQL server should bind");

        let addr = server.server_addr();
        let (handle, stop) = server.stoppable();
        MockGraphQl {
            addr,
            stop: Some((handle, stop)),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/graphql", self.addr)
    }
}

impl Drop for MockGraphQl {
    fn drop(&mut self) {
        if let Some((handle, stop)) = self.stop.take() {
            let _ = stop.send(());
            let _ = handle.join();
        }
    }
}

/// Station A with three monitor rows, station B with one.
pub const TWO_STATIONS: &str = r#"{"data": {"stationItems": [
    {"StationCode": "1", "StationName": "A", "StationShortName": "SA", "StationLocation": "Domain",
     "StationCity": "Ashburton", "StationLatitude": -43.91224, "StationLongitude": 171.7552,
     "MonitorChannel": 1, "MonitorName": "PM10", "MonitorTypeCode": "PM10",
     "MonitorTypeDescription": "Particulate matter 10", "MonitorFullName": "PM10 BAM"},
    {"StationCode": "1", "StationName": "A", "StationShortName": "SA", "StationLocation": "Domain",
     "StationCity": "Ashburton", "StationLatitude": -43.91224, "StationLongitude": 171.7552,
     "MonitorChannel": 2, "MonitorName": "PM2.5", "MonitorTypeCode": "PM2.5",
     "MonitorTypeDescription": "Particulate matter 2.5", "MonitorFullName": "PM2.5 BAM"},
    {"StationCode": "1", "StationName": "A", "StationShortName": "SA", "StationLocation": "Domain",
     "StationCity": "Ashburton", "StationLatitude": -43.91224, "StationLongitude": 171.7552,
     "MonitorChannel": 3, "MonitorName": "WS", "MonitorTypeCode": "WS",
     "MonitorTypeDescription": "Wind speed", "MonitorFullName": "Wind Speed"},
    {"StationCode": "2", "StationName": "B", "StationShortName": "SB", "StationLocation": "Park",
     "StationCity": "Timaru", "StationLatitude": -44.3967, "StationLongitude": 171.2536,
     "MonitorChannel": 1, "MonitorName": "PM10", "MonitorTypeCode": "PM10",
     "MonitorTypeDescription": "Particulate matter 10", "MonitorFullName": "PM10 BAM"}
]}}"#;
