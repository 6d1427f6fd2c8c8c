pub mod dns_query;

pub use dns_query::{dns_query_get, dns_query_post, DnsQueryParams, DNS_MESSAGE};
