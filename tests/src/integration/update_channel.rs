//! # Controller Sessions
//!
//! Drives a full node over TCP: topology file on disk, initial verification,
//! update channel, mutation queue, verifier.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::SocketAddr;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;
    use veriflow_node::{NodeConfig, NodeRuntime};
    use vf_01_verification::VerifierApi;
    use vf_02_update_channel::ChannelConfig;

    struct Controller {
        stream: BufReader<TcpStream>,
    }

    impl Controller {
        async fn connect(addr: SocketAddr) -> Self {
            Self {
                stream: BufReader::new(TcpStream::connect(addr).await.unwrap()),
            }
        }

        async fn send(&mut self, line: &str) -> String {
            let framed = format!("{line}\n");
            self.stream.get_mut().write_all(framed.as_bytes()).await.unwrap();
            let mut reply = String::new();
            self.stream.read_line(&mut reply).await.unwrap();
            reply.trim_end().to_string()
        }
    }

    async fn start_node(topology: &str) -> (NodeRuntime, SocketAddr, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(topology.as_bytes()).unwrap();

        let config = NodeConfig {
            topology_path: Some(file.path().to_path_buf()),
            channel: ChannelConfig {
                port: 0,
                max_connections: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut runtime = NodeRuntime::new(config).unwrap();
        let addr = runtime.start().await.unwrap();
        (runtime, addr, file)
    }

    #[tokio::test]
    async fn test_controller_session() {
        let (runtime, addr, _file) =
            start_node("Net\nS1:S2\nS2:S1\nH\nH1:S1\nH2:S2\nR\n").await;
        let mut controller = Controller::connect(addr).await;

        assert_eq!(controller.send("[CCPDN] Hello").await, "[VERIFLOW] Hello");
        assert_eq!(
            controller.send("[CCPDN] FLOW A#S1-10.0.0.0/24-S2").await,
            "[VERIFLOW] Success"
        );

        let reply = controller.send("[CCPDN] FLOW A#S2-10.0.0.0/24-S1").await;
        assert!(reply.starts_with("[VERIFLOW] Fail 2 violation(s): loop for 10.0.0.0/24"));

        assert_eq!(
            controller.send("R#S2-10.0.0.0/24-S1").await,
            "[VERIFLOW] Success"
        );
        assert_eq!(
            controller.send("listflows S1").await,
            "[VERIFLOW] Flows S1: S1-10.0.0.0/24-S2"
        );
        assert_eq!(
            controller.send("S#").await,
            "[VERIFLOW] Status switches=2 hosts=2 rules=1 ecs=25 errors=0"
        );

        drop(controller);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_commands_leave_state_untouched() {
        let (runtime, addr, _file) = start_node("Net\nS1:S2\nS2:S1\nH\nH1:S1\nR\n").await;
        let mut controller = Controller::connect(addr).await;

        assert!(controller
            .send("A#S1-10.0.0.0/33-S2")
            .await
            .starts_with("[VERIFLOW] Fail rejected: invalid rule: Invalid mask length"));
        assert_eq!(
            controller.send("A#S9-10.0.0.0/24-S2").await,
            "[VERIFLOW] Fail rejected: Unknown switch: S9"
        );
        assert!(controller
            .send("Q#S1-10.0.0.0/24-S2")
            .await
            .starts_with("[VERIFLOW] Fail rejected"));

        let status = runtime.service().status();
        assert_eq!(status.rules, 0);
        assert_eq!(status.ec_count, 1);

        drop(controller);
        runtime.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_controllers_are_serialized() {
        let (runtime, addr, _file) = start_node("Net\nS1:S2\nS2:S1\nH\nH1:S1\nH2:S2\nR\n").await;

        let mut sessions = Vec::new();
        for client in 0..8u8 {
            sessions.push(tokio::spawn(async move {
                let mut controller = Controller::connect(addr).await;
                for i in 0..10u8 {
                    let reply = controller
                        .send(&format!("A#S1-10.{client}.{i}.0/24-H1"))
                        .await;
                    assert_eq!(reply, "[VERIFLOW] Success");
                }
            }));
        }
        for session in sessions {
            session.await.unwrap();
        }

        let status = runtime.service().status();
        assert_eq!(status.rules, 80);
        assert_eq!(status.errors, 0);

        let incremental = runtime.service().current_errors();
        runtime.service().verify_all().unwrap();
        assert_eq!(runtime.service().current_errors(), incremental);

        runtime.shutdown().await.unwrap();
    }
}
