use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    #[clap(env, long)]
    pub database_url: String,

    /// Comma separated list of origins allowed through CORS
    #[clap(env, long)]
    pub origin_urls: String,

    #[clap(env, long, default_value = "8000")]
    pub port: u16,

    /// Directory QR images are written under, served at /media
    #[clap(env, long, default_value = "media")]
    pub media_dir: String,

    /// Base URL the scanning device resolves the QR link against,
    /// e.g. http://192.168.1.20:8000 on a LAN deployment
    #[clap(env, long)]
    pub scan_base_url: String,
}
