use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tably-server")]
pub struct Params {
    #[arg(long, env = "TABLY_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "TABLY_PORT", default_value_t = 3000)]
    pub port: u16,
}
