use crate::helpers::ScriptedProbe;

use decker_core::error::port::PortError;
use decker_core::port::{PortNegotiator, PortProbe, SocketTableProbe};

use std::sync::Arc;

use tokio::net::TcpListener;

/// **VALUE**: Verifies negotiation probes upward one port at a time and stops at the first
/// free one.
///
/// **WHY THIS MATTERS**: The probe is an external command; extra probes cost real time.
///
/// **BUG THIS CATCHES**: Would catch skipped ports, probes after success, or parallel probing
/// out of order.
#[tokio::test]
async fn given_k_occupied_ports_when_negotiating_then_k_plus_one_probes_in_order() {
    // GIVEN: 3000..=3003 occupied
    let probe = Arc::new(ScriptedProbe::occupied(3000..=3003));
    let negotiator = PortNegotiator::new(probe.clone(), 100);

    // WHEN: Negotiating from 3000
    let port = negotiator.negotiate(3000).await.unwrap();

    // THEN: 3004 after exactly five probes
    assert_eq!(port, 3004);
    assert_eq!(probe.probed(), vec![3000, 3001, 3002, 3003, 3004]);
}

/// **VALUE**: Verifies a free starting port is returned after a single probe.
#[tokio::test]
async fn given_free_start_when_negotiating_then_start_returned() {
    let probe = Arc::new(ScriptedProbe::free());
    let negotiator = PortNegotiator::new(probe.clone(), 100);

    assert_eq!(negotiator.negotiate(8888).await.unwrap(), 8888);
    assert_eq!(probe.probed(), vec![8888]);
}

/// **VALUE**: Verifies the attempt limit ends negotiation with `Exhausted`.
///
/// **WHY THIS MATTERS**: A probe that always answers "occupied" would otherwise loop forever.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one letting one extra probe through.
#[tokio::test]
async fn given_all_occupied_when_negotiating_then_exhausted_after_max_attempts() {
    let probe = Arc::new(ScriptedProbe::everything_occupied());
    let negotiator = PortNegotiator::new(probe.clone(), 7);

    let result = negotiator.negotiate(9000).await;

    match result {
        Err(PortError::Exhausted {
            start, attempts, ..
        }) => {
            assert_eq!(start, 9000);
            assert_eq!(attempts, 7);
        }
        other => panic!("Expected Exhausted, got {other:?}"),
    }
    assert_eq!(probe.probed().len(), 7);
}

/// **VALUE**: Verifies the search stops at the top of the port range.
///
/// **WHY THIS MATTERS**: Incrementing past 65535 would wrap to port 0.
///
/// **BUG THIS CATCHES**: Would catch an overflow panic in debug builds or a wrap in release.
#[tokio::test]
async fn given_start_near_top_when_all_occupied_then_exhausted_without_wrapping() {
    let probe = Arc::new(ScriptedProbe::everything_occupied());
    let negotiator = PortNegotiator::new(probe.clone(), 100);

    let result = negotiator.negotiate(65534).await;

    assert!(matches!(
        result,
        Err(PortError::Exhausted { attempts: 2, .. })
    ));
    assert_eq!(probe.probed(), vec![65534, 65535]);
}

/// **VALUE**: Verifies a zero attempt limit still probes once.
#[test]
fn given_zero_attempts_when_constructing_then_clamped_to_one() {
    let negotiator = PortNegotiator::new(Arc::new(ScriptedProbe::free()), 0);
    assert_eq!(negotiator.max_attempts(), 1);
}

/// **VALUE**: Verifies the socket-table probe sees a listener bound by this test.
///
/// **WHY THIS MATTERS**: It is the fallback when `lsof` is not installed.
///
/// **BUG THIS CATCHES**: Would catch the local port being compared against the remote port.
///
/// **ENVIRONMENT-DEPENDENT**: Some sandboxes hide the socket table; a probe error is
/// accepted there.
#[tokio::test]
async fn given_bound_listener_when_probing_socket_table_then_occupied() {
    // GIVEN: A listener on an ephemeral port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // WHEN: Probing that port
    let result = SocketTableProbe.is_occupied(port).await;

    // THEN: Occupied, unless the socket table is unavailable
    match result {
        Ok(occupied) => assert!(occupied, "Port {port} should be occupied"),
        Err(PortError::Probe { .. }) => {}
        Err(other) => panic!("Unexpected error: {other}"),
    }
}
