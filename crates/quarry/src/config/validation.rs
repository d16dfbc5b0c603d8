use super::Config;
use crate::{Error, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    for (index, source) in config.sources.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(Error::invalid_configuration(format!(
                "sources[{index}].name is required"
            )));
        }
        if source.provider.trim().is_empty() {
            return Err(Error::invalid_configuration(format!(
                "sources[{index}].provider is required for source `{}`",
                source.name
            )));
        }
        if source.connection.trim().is_empty() {
            return Err(Error::invalid_configuration(format!(
                "sources[{index}].connection is required for source `{}`",
                source.name
            )));
        }
        if source.parameter_prefix.is_empty() {
            return Err(Error::invalid_configuration(format!(
                "sources[{index}].parameter_prefix must not be empty for source `{}`",
                source.name
            )));
        }
    }

    // Every logical source needs somewhere to write
    for source in &config.sources {
        let writable = config
            .sources
            .iter()
            .any(|other| other.name == source.name && other.writable);

        if !writable {
            return Err(Error::invalid_configuration(format!(
                "source `{}` has no writable entry",
                source.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Config;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_fill_optional_fields() {
        let config = Config::from_yaml(
            r#"
            sources:
              - name: Default
                connection: "sqlite::memory:"
                provider: sqlite
            "#,
        )
        .unwrap();

        let source = &config.sources[0];
        assert_eq!(source.parameter_prefix, "@");
        assert_eq!(source.order, 0);
        assert!(source.readable && source.writable);
        assert!(!config.schema.sync_on_build);
    }

    #[test]
    fn read_only_source_needs_a_writable_sibling() {
        let yaml = r#"
            sources:
              - name: Reports
                connection: "postgresql://localhost/reports"
                provider: postgresql
                writable: false
            "#;

        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("`Reports` has no writable entry"));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let yaml = r#"
            sources:
              - name: Default
                connection: "sqlite::memory:"
                provider: sqlite
                parameter_prefix: ""
            "#;

        assert!(Config::from_yaml(yaml)
            .unwrap_err()
            .is_invalid_configuration());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = r#"
            schema:
              sync_on_boot: true
            "#;

        assert!(Config::from_yaml(yaml)
            .unwrap_err()
            .is_invalid_configuration());
    }
}
