pub mod http_stats_client;
