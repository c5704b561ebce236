pub fn print_banner(version: &str) {
    let banner = format!(
        r#"
 ███████╗██╗ ██████╗██╗  ██╗███████╗
 ██╔════╝██║██╔════╝██║  ██║██╔════╝    company enrichment
 █████╗  ██║██║     ███████║█████╗      v{}
 ██╔══╝  ██║██║     ██╔══██║██╔══╝
 ██║     ██║╚██████╗██║  ██║███████╗
 ╚═╝     ╚═╝ ╚═════╝╚═╝  ╚═╝╚══════╝
"#,
        version
    );

    tracing::info!("{}", banner);
}
