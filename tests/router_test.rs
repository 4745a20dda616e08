// tests/router_test.rs
use std::sync::Arc;

use platform_channel::{
    BinaryMessenger, MessageOrigin, PlatformError, Plugin, Registrar, handler_fn,
    test_util::RecordingErrorReporter,
};
use plugin_bridge::{App, plugins::builtin_plugins, transport::InMemoryTransport};
use tokio::time::{Duration, timeout};

/// Boots the bridge on an in-memory host with the given plugins.
fn boot(plugins: &[Box<dyn Plugin>]) -> (App, InMemoryTransport, RecordingErrorReporter) {
    let transport = InMemoryTransport::new();
    let reporter = RecordingErrorReporter::new();
    let app = App::bootstrap(
        Arc::new(transport.clone()),
        Arc::new(reporter.clone()),
        plugins,
    )
    .unwrap();
    (app, transport, reporter)
}

async fn deliver(transport: &InMemoryTransport, channel: &str, payload: &[u8]) -> Option<Vec<u8>> {
    timeout(
        Duration::from_secs(2),
        transport.deliver_platform_message(channel, Some(payload.to_vec())),
    )
    .await
    .expect("platform message was never answered")
}

#[tokio::test]
async fn ping_scenario() {
    let (app, transport, reporter) = boot(&builtin_plugins());

    let reply = deliver(&transport, "ping", b"hello").await;
    assert_eq!(reply, Some(b"pong".to_vec()));
    assert_eq!(reporter.count(), 0);

    app.router().set_handler("ping", None).unwrap();

    let reply = deliver(&transport, "ping", b"hello").await;
    assert_eq!(reply, None);
    assert_eq!(reporter.count(), 0);
}

#[tokio::test]
async fn echo_plugin_round_trips_payload() {
    let (_app, transport, _) = boot(&builtin_plugins());
    let reply = deliver(&transport, plugin_bridge::plugins::echo::CHANNEL, b"\x00binary\xff").await;
    assert_eq!(reply, Some(b"\x00binary\xff".to_vec()));
}

#[tokio::test]
async fn throwing_handler_is_reported_once() {
    let (app, transport, reporter) = boot(&[]);
    let registrar = app.registry().registrar_for("flaky");
    registrar
        .set_handler(
            "flaky",
            Some(handler_fn(|_| async { Err(anyhow::anyhow!("database offline")) })),
        )
        .unwrap();

    let reply = deliver(&transport, "flaky", b"query").await;
    assert_eq!(reply, None);

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, MessageOrigin::FrameworkToPlugin);
    assert_eq!(reports[0].0.to_string(), "during a framework-to-plugin message");
    assert!(reports[0].1.contains("database offline"));
}

#[tokio::test]
async fn plugins_can_call_the_framework() {
    struct Lifecycle;

    impl Plugin for Lifecycle {
        fn key(&self) -> &str {
            "lifecycle"
        }

        fn register_with(&self, registrar: &Registrar) -> anyhow::Result<()> {
            // relays every inbound message to the framework and returns its answer
            let messenger = registrar.messenger();
            registrar.set_handler(
                "lifecycle/relay",
                Some(handler_fn(move |payload| {
                    let messenger = messenger.clone();
                    async move {
                        messenger
                            .send("framework/lifecycle", payload)
                            .await
                            .map_err(anyhow::Error::from)
                    }
                })),
            )?;
            Ok(())
        }
    }

    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(Lifecycle)];
    let (_app, transport, reporter) = boot(&plugins);
    transport.set_framework_listener(
        "framework/lifecycle",
        Some(handler_fn(|_| async { Ok(Some(b"resumed".to_vec())) })),
    );

    let reply = deliver(&transport, "lifecycle/relay", b"state?").await;
    assert_eq!(reply, Some(b"resumed".to_vec()));
    assert_eq!(reporter.count(), 0);
}

#[tokio::test]
async fn mock_handlers_are_rejected_through_registrars() {
    let (app, _, _) = boot(&builtin_plugins());
    let messenger = app.registry().registrar_for("anyone").messenger();

    let err = messenger.set_mock_handler("ping", None).unwrap_err();
    assert!(matches!(err, PlatformError::MockHandlersUnsupported));
    assert!(err.to_string().contains("not supported"));

    let err = messenger.has_mock_handler("ping", None).unwrap_err();
    assert!(matches!(err, PlatformError::MockHandlersUnsupported));
}

#[tokio::test]
async fn registered_plugins_are_listed() {
    let (app, _, _) = boot(&builtin_plugins());
    assert_eq!(app.registry().plugins(), vec!["echo".to_string(), "ping".to_string()]);
    assert_eq!(
        app.router().channels(),
        vec!["ping".to_string(), "plugin_bridge/echo".to_string()]
    );
}
