use async_trait::async_trait;
use fastdns_domain::config::AnswersConfig;
use fastdns_domain::{ConfigError, Rcode, RecordType, Request};
use fastdns_infrastructure::dns::{reply, Handler, ResponseWriter};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Answers every A question with the configured IPv4 list and every AAAA
/// question with the IPv6 list. Everything else, including a family with no
/// configured addresses, gets NXDOMAIN.
pub struct StaticAnswerHandler {
    ipv4: Vec<IpAddr>,
    ipv6: Vec<IpAddr>,
    ttl: u32,
}

impl StaticAnswerHandler {
    pub fn new(ipv4: Vec<IpAddr>, ipv6: Vec<IpAddr>, ttl: u32) -> Self {
        Self { ipv4, ipv6, ttl }
    }

    pub fn from_config(answers: &AnswersConfig) -> Result<Self, ConfigError> {
        let ipv4 = answers.ipv4_addrs()?.into_iter().map(IpAddr::V4).collect();
        let ipv6 = answers.ipv6_addrs()?.into_iter().map(IpAddr::V6).collect();
        Ok(Self::new(ipv4, ipv6, answers.ttl))
    }

    fn addresses_for(&self, record_type: RecordType) -> &[IpAddr] {
        match record_type {
            RecordType::A => &self.ipv4,
            RecordType::AAAA => &self.ipv6,
            _ => &[],
        }
    }
}

#[async_trait]
impl Handler for StaticAnswerHandler {
    async fn serve_dns(&self, rw: &mut dyn ResponseWriter, req: &Request) {
        let record_type = req.question.record_type;
        debug!(
            client = %rw.remote_addr(),
            domain = %req.domain,
            class = req.question.class,
            record_type = %record_type,
            "DNS query received"
        );

        let ips = self.addresses_for(record_type);
        let written = if ips.is_empty() {
            reply::error(rw, req, Rcode::NXDomain)
        } else {
            reply::host(rw, req, ips, self.ttl)
        };

        if let Err(e) = written {
            warn!(client = %rw.remote_addr(), error = %e, "Failed to send response");
        }
    }
}
