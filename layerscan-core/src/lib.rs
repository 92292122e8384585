pub mod config;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"
    __
   / /___ ___  _____  _____________ _____ _____
  / / __ `/ / / / _ \/ ___/ ___/ __/ __ `/ __ \
 / / /_/ / /_/ /  __/ /  (__  ) /_/ /_/ / / / /
/_/\__,_/\__, /\___/_/  /____/\__/\__,_/_/ /_/
        /____/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_magenta().bold());
    println!(
        "{}",
        "  Hidden service reconnaissance for the anonymized web".bright_cyan()
    );
    println!("{}\n", "  github.com/ubxroot/layerscan".dimmed());
}
