pub mod common;

use embassy_futures::block_on;
use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_sync::channel::Channel;
use mnk::config::BleConfig;
use mnk::state::ConnectionStateCell;
use mnk::{
    CONNECTION_EVENT_CHANNEL, ConnectionEvent, ConnectionManager, ConnectionState, RawMutex, report_connection_event,
};

use crate::common::RecordingAdvertiser;

#[test]
fn test_connect_failed_keeps_advertising() {
    let state = ConnectionStateCell::new();
    let mut manager = ConnectionManager::new(RecordingAdvertiser::default(), &BleConfig::new("mnk.01"), &state);
    block_on(async {
        manager.start().await.unwrap();
        manager.handle_event(ConnectionEvent::ConnectFailed).await.unwrap();
    });
    assert_eq!(state.get(), ConnectionState::Advertising);
    assert!(manager.is_advertising());
    assert_eq!(manager.advertiser().names, ["mnk.01", "mnk.01"]);
}

#[test]
fn test_disconnect_readvertises() {
    let state = ConnectionStateCell::new();
    let mut manager = ConnectionManager::new(RecordingAdvertiser::default(), &BleConfig::new("mnk.01"), &state);
    block_on(async {
        manager.start().await.unwrap();
        manager.handle_event(ConnectionEvent::Connected(0x40)).await.unwrap();
        assert!(state.is_connected());
        manager.handle_event(ConnectionEvent::Disconnected).await.unwrap();
    });
    assert_eq!(state.get(), ConnectionState::Advertising);
    assert_eq!(manager.conn_handle(), None);
    assert_eq!(manager.advertiser().names.len(), 2);
}

#[test]
fn test_advertise_failure_not_retried() {
    let state = ConnectionStateCell::new();
    let advertiser = RecordingAdvertiser {
        fail: true,
        ..Default::default()
    };
    let mut manager = ConnectionManager::new(advertiser, &BleConfig::new("mnk.01"), &state);
    let result = block_on(manager.start());
    assert!(result.is_err());
    assert_eq!(state.get(), ConnectionState::Advertising);
    assert!(!manager.is_advertising());
    assert!(manager.advertiser().names.is_empty());
}

#[test]
fn test_run_drains_notifications() {
    let state = ConnectionStateCell::new();
    let mut manager = ConnectionManager::new(RecordingAdvertiser::default(), &BleConfig::new("mnk.01"), &state);
    let channel: Channel<RawMutex, ConnectionEvent, 4> = Channel::new();

    block_on(async {
        let events = async {
            channel.send(ConnectionEvent::Connected(3)).await;
            channel.send(ConnectionEvent::Disconnected).await;
            channel.send(ConnectionEvent::Connected(5)).await;
            // Let the manager drain the channel
            for _ in 0..8 {
                yield_now().await;
            }
        };
        match select(manager.run(channel.receiver()), events).await {
            Either::First(_) => unreachable!(),
            Either::Second(()) => {}
        }
    });

    assert!(state.is_connected());
    assert_eq!(manager.conn_handle(), Some(5));
    assert_eq!(manager.advertiser().names.len(), 2);
}

#[test]
fn test_report_connection_event() {
    CONNECTION_EVENT_CHANNEL.clear();
    assert!(report_connection_event(ConnectionEvent::Connected(1)));
    assert_eq!(CONNECTION_EVENT_CHANNEL.try_receive().ok(), Some(ConnectionEvent::Connected(1)));
}
