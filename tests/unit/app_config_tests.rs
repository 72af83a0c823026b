/*!
 * Tests for application configuration
 */

use anyhow::Result;
use lectern::app_config::{Config, QaProvider};
use crate::common;

/// Test that the default configuration validates
#[test]
fn test_default_config_withNoChanges_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

/// Test default values match the documented conventions
#[test]
fn test_default_config_withNoChanges_shouldUseConventionalDefaults() {
    let config = Config::default();
    assert_eq!(config.output_dir, "output");
    assert_eq!(config.temp_dir, "temp");
    assert_eq!(config.tts.sample_rate, 22_050);
    assert_eq!(config.qa.model, "llama3.2:3b");
    assert_eq!(config.qa.endpoint, "http://localhost:11434");
    assert_eq!(config.qa.provider, QaProvider::Ollama);
}

/// Test TTS command placeholder validation
#[test]
fn test_validate_withMissingTtsPlaceholders_shouldFail() {
    let mut config = Config::default();
    config.tts.command = "espeak-ng {text}".to_string();
    assert!(config.validate().is_err());

    config.tts.command = "espeak-ng -w {output}".to_string();
    assert!(config.validate().is_err());
}

/// Test temperature range validation
#[test]
fn test_validate_withOutOfRangeTemperature_shouldFail() {
    let mut config = Config::default();
    config.qa.temperature = 2.5;
    assert!(config.validate().is_err());
}

/// Test that an enhance command without placeholders is rejected
#[test]
fn test_validate_withBadEnhanceCommand_shouldFail() {
    let mut config = Config::default();
    config.enhance.command = "gfpgan-cli --fix".to_string();
    assert!(config.validate().is_err());

    config.enhance.command = "gfpgan-cli -i {input} -o {output}".to_string();
    assert!(config.validate().is_ok());
}

/// Test config file round trip
#[test]
fn test_config_file_roundtrip_withDefaults_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::default();
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.tts.command, config.tts.command);
    assert_eq!(loaded.qa.num_predict, config.qa.num_predict);

    Ok(())
}

/// Test partial config files fill missing fields with defaults
#[test]
fn test_from_file_withPartialConfig_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{ "output_dir": "custom_out" }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.output_dir, "custom_out");
    assert_eq!(config.temp_dir, "temp");
    assert_eq!(config.qa.temperature, 0.7);

    Ok(())
}

/// Test missing config path falls back to defaults
#[test]
fn test_from_file_or_default_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::from_file_or_default(temp_dir.path().join("nope.json"))?;
    assert_eq!(config.output_dir, "output");
    Ok(())
}

/// Test provider parsing
#[test]
fn test_qa_provider_fromStr_withKnownNames_shouldParse() {
    assert_eq!("ollama".parse::<QaProvider>().unwrap(), QaProvider::Ollama);
    assert_eq!("Ollama".parse::<QaProvider>().unwrap(), QaProvider::Ollama);
    assert!("openai".parse::<QaProvider>().is_err());
}
