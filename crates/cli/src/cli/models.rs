use parley_domain::config::Config;

/// Print the model catalog, marking the default and reasoning variants.
pub fn list(config: &Config) {
    let catalog = config.catalog();
    for option in catalog.options() {
        let marker = if option.model == config.session.default_model {
            "*"
        } else {
            " "
        };
        let reasoning = if option.reasoning { "  [reasoning]" } else { "" };
        println!(
            "{marker} {:<20} {:<32} {}{reasoning}",
            option.key, option.model, option.label
        );
    }
}
