//! Runs the client against the responder through an ActiveMQ Artemis broker.
//!
//! Needs docker, run with `cargo test -- --ignored`.

use std::time::Duration;

use fe2o3_amqp_reqrep::{run, server::Responder, Address, AmqpEndpoint, Client};
use testcontainers::{clients, core::WaitFor, GenericImage};

#[tokio::test]
#[ignore]
async fn activemq_artemis_request_response() {
    let docker = clients::Cli::default();
    let image = GenericImage::new("docker.io/vromero/activemq-artemis", "latest")
        .with_env_var("DISABLE_SECURITY", "true")
        .with_exposed_port(5672)
        .with_wait_for(WaitFor::seconds(5));
    let node = docker.run(image);
    tokio::time::sleep(Duration::from_millis(3_000)).await; // wait for container to start

    let port = node.get_host_port_ipv4(5672);
    let address: Address = format!("localhost:{}/examples", port).parse().unwrap();

    let mut responder = Responder::attach(&address).await.unwrap();
    let serve = async {
        for _ in 0..2 {
            responder.serve_one().await.unwrap();
        }
        responder.close().await.unwrap();
    };

    let mut out = Vec::new();
    let request = async {
        let mut client = Client::new(address.node(), ["hello", "world"]);
        let mut endpoint = AmqpEndpoint::connect(&address).await.unwrap();
        run(&mut client, &mut endpoint, &mut out).await.unwrap();
    };

    tokio::join!(serve, request);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "hello => HELLO\nworld => WORLD\n"
    );
}
