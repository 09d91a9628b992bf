//! Integration tests for types

#[cfg(test)]
mod tests {
    use envreq_types::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn framework_strategy() -> impl Strategy<Value = FrameworkOption> {
        prop::sample::select(FrameworkOption::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn toggled_set_is_odd_count_keys(toggles in prop::collection::vec(framework_strategy(), 0..32)) {
            let mut form = EnvironmentRequestForm::default();
            let mut counts: HashMap<FrameworkOption, usize> = HashMap::new();
            for option in &toggles {
                form.toggle_framework(*option);
                *counts.entry(*option).or_default() += 1;
            }

            for option in FrameworkOption::ALL {
                let odd = counts.get(&option).copied().unwrap_or(0) % 2 == 1;
                prop_assert_eq!(form.frameworks.contains(option), odd);
            }
            prop_assert_eq!(
                form.frameworks.len(),
                counts.values().filter(|c| *c % 2 == 1).count()
            );
        }

        #[test]
        fn reset_restores_defaults(name in ".*", purpose in ".*", toggles in prop::collection::vec(framework_strategy(), 0..8)) {
            let mut form = EnvironmentRequestForm {
                env_name: name,
                env_purpose: purpose,
                use_case: "churn".into(),
                data_domain: "finance".into(),
                instance_type: InstanceType::Large,
                ide_option: IdeOption::Sas,
                frameworks: toggles.into_iter().collect(),
            };
            form.reset();
            prop_assert_eq!(form, EnvironmentRequestForm::default());
        }
    }

    #[test]
    fn test_payload_serialization() {
        let mut form = EnvironmentRequestForm {
            env_name: "Data Science Sandbox".into(),
            env_purpose: "experimentation".into(),
            ..Default::default()
        };
        form.toggle_framework(FrameworkOption::Xgboost);
        form.toggle_framework(FrameworkOption::Pytorch);

        let json = serde_json::to_value(form.to_payload("anonymous")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "env_name": "Data Science Sandbox",
                "env_purpose": "experimentation",
                "use_case": "",
                "data_domain": "",
                "instance_type": "small",
                "ide_option": "jupyter",
                "framework_option": "xgboost,pytorch",
                "requested_by": "anonymous",
                "status": "submitted"
            })
        );
    }

    #[test]
    fn test_jupyter_envelope_without_data() {
        let envelope: JupyterUrlEnvelope = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_record_frameworks() {
        let record: EnvRequestRecord = serde_json::from_str(
            r#"{"request_id": "r1", "env_name": "sandbox", "framework_option": "xgboost, custom"}"#,
        )
        .unwrap();
        assert_eq!(record.frameworks(), vec!["xgboost", "custom"]);
        assert_eq!(record.status, None);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Tty);
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }
}
