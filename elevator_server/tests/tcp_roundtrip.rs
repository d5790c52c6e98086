use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;
use elevator_common::catalog::Catalog;
use elevator_common::invoice::InvoiceDraft;
use elevator_common::protocol::{Request, Response};
use elevator_common::quote::{LineEdit, LinePatch};
use elevator_common::store::MemoryInvoiceStore;
use elevator_common::system::{Category, StopCount};
use elevator_server::worker::spawn_workers;
use elevator_server::{CommandReceiver, QuoteService};

const CATALOG: &str = r#"[
    {"itemId": 4, "name": "pulley", "unit": "حلقه", "category": "gearless",
     "unitPrice": 8500000, "calcType": "fixed", "fixedQty": 4},
    {"itemId": 59, "name": "installation", "unit": "توقف", "category": "gearless",
     "unitPrice": 480000, "calcType": "per_stop"}
]"#;

fn start_server() -> SocketAddr {
    let catalog = Catalog::from_reader(CATALOG.as_bytes()).unwrap();
    let service = Arc::new(QuoteService::new(
        catalog,
        None,
        Box::new(MemoryInvoiceStore::new()),
    ));
    let receiver = CommandReceiver::new("127.0.0.1:0").unwrap();
    let addr = receiver.local_addr().unwrap();

    let (tx, rx) = unbounded::<TcpStream>();
    spawn_workers(2, rx, service);
    thread::spawn(move || receiver.accept_loop(tx));
    addr
}

fn send_raw(addr: SocketAddr, line: &[u8]) -> Response {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(line).unwrap();
    let mut reply = String::new();
    BufReader::new(stream).read_line(&mut reply).unwrap();
    Response::from_line(&reply).unwrap()
}

#[test]
fn quote_over_tcp() {
    let addr = start_server();
    let request = Request::CalculateQuote {
        system_type: "GEARLESS".to_string(),
        stop_count: 7,
    };
    let response = send_raw(addr, &request.to_line().unwrap());
    let Response::Quote(quote) = response else {
        panic!("unexpected {:?}", response);
    };
    assert_eq!(quote.grand_total(), 37_360_000);
}

#[test]
fn malformed_request_does_not_stop_the_server() {
    let addr = start_server();
    let response = send_raw(addr, b"not json\n");
    assert!(matches!(response, Response::Error { .. }));

    let response = send_raw(addr, &Request::Health.to_line().unwrap());
    assert!(matches!(response, Response::Health { ref status, .. } if status == "ok"));
}

#[test]
fn concurrent_line_edits_are_both_kept() {
    let addr = start_server();
    let request = Request::CalculateQuote {
        system_type: "gearless".to_string(),
        stop_count: 7,
    };
    let Response::Quote(quote) = send_raw(addr, &request.to_line().unwrap()) else {
        panic!("quote failed");
    };
    let create = Request::CreateInvoice {
        input: InvoiceDraft {
            customer_name: Some("Rahimi".to_string()),
            system_type: Category::Gearless,
            stop_count: StopCount::new(7).unwrap(),
            items: quote.into_items(),
            notes: None,
        },
    };
    let Response::Invoice(Some(invoice)) = send_raw(addr, &create.to_line().unwrap()) else {
        panic!("create failed");
    };

    let edits = [
        LineEdit::Update {
            item_id: 4,
            patch: LinePatch {
                quantity: Some(2.0),
                ..Default::default()
            },
        },
        LineEdit::Add {
            name: "paint".to_string(),
            unit: "عدد".to_string(),
            quantity: 1.0,
            unit_price: 1000.0,
        },
    ];
    let handles: Vec<_> = edits
        .into_iter()
        .map(|edit| {
            let line = Request::EditInvoiceLine { id: invoice.id, edit }.to_line().unwrap();
            thread::spawn(move || send_raw(addr, &line))
        })
        .collect();
    for handle in handles {
        assert!(matches!(handle.join().unwrap(), Response::Invoice(Some(_))));
    }

    let Response::Invoice(Some(stored)) =
        send_raw(addr, &Request::Invoice { id: invoice.id }.to_line().unwrap())
    else {
        panic!("lookup failed");
    };
    assert_eq!(stored.quote.items().len(), 3);
    assert_eq!(stored.quote.items()[0].quantity, 2.0);
    // 2 * 8_500_000 + 7 * 480_000 + 1000
    assert_eq!(stored.grand_total(), 20_361_000);
}
