//! End-to-end runs of the refresh pipeline on temporary directories.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use statrefresh::config::outputs;
use statrefresh::{
    read_csv_file, run_pipeline, InputFiles, LoadError, PipelineConfig, PipelineError, Step,
};
use tempfile::{tempdir, TempDir};
use zip::write::SimpleFileOptions;

const WIDE: &str = "\"Data Source\",\"World Development Indicators\",\n\
\n\
\"Last Updated Date\",\"2024-06-28\",\n\
\n\
\"Country Name\",\"Country Code\",\"Indicator Name\",\"Indicator Code\",\"2019\",\"2020\",\"2021\",\n\
\"Korea, Rep.\",\"KOR\",\"GDP (current US$)\",\"NY.GDP.MKTP.CD\",\"100\",\"200\",\"210\",\n\
\"Korea, Rep.\",\"KOR\",\"Population, total\",\"SP.POP.TOTL\",\"51\",\"\",\"52\",\n";

const COUNTRY_META: &str = "\"Country Code\",\"Region\",\"IncomeGroup\",\"SpecialNotes\",\"TableName\",\n\
\"KOR\",\"East Asia & Pacific\",\"High income\",\"\",\"Korea, Rep.\",\n";

const INDICATOR_META: &str = "\"INDICATOR_CODE\",\"INDICATOR_NAME\",\"SOURCE_NOTE\",\"SOURCE_ORGANIZATION\",\n\
\"NY.GDP.MKTP.CD\",\"GDP (current US$)\",\"GDP at purchaser's prices\",\"World Bank\",\n";

const MUNICIPAL_STATS: &str = "Code,Name,Population\n11,Seoul,9668465\n21,Busan,3349016\n";

fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            let runs: Vec<String> = p
                .split('\t')
                .map(|part| format!("<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>", part))
                .collect();
            format!("<w:p>{}</w:p>", runs.join("<w:r><w:tab/></w:r>"))
        })
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
        body
    );

    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    zip.start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Raw dir with every input; the municipal stats are a CSV so the test does
/// not need a workbook writer.
fn setup(indicator_meta: &str) -> (TempDir, PipelineConfig) {
    let root = tempdir().unwrap();
    let raw = root.path().join("raw");
    fs::create_dir_all(&raw).unwrap();

    let inputs = InputFiles {
        municipal_stats: "municipal_stats.csv".to_string(),
        ..InputFiles::default()
    };

    fs::write(raw.join(&inputs.indicators), WIDE).unwrap();
    fs::write(raw.join(&inputs.country_metadata), COUNTRY_META).unwrap();
    fs::write(raw.join(&inputs.indicator_metadata), indicator_meta).unwrap();
    fs::write(raw.join(&inputs.municipal_stats), MUNICIPAL_STATS).unwrap();
    write_docx(
        &raw.join(&inputs.municipalities),
        &["Municipality list", "11\tSeoul", "no tab here", "21\t Busan "],
    );

    let config = PipelineConfig::new(raw, root.path().join("processed"), "owner/slug").with_inputs(inputs);
    (root, config)
}

fn indicator_meta_with_spaced_headers() -> String {
    INDICATOR_META
        .replace("INDICATOR_CODE", "Indicator Code")
        .replace("INDICATOR_NAME", "Indicator Name")
}

#[test]
fn test_full_run_writes_every_output() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());

    let report = run_pipeline(&config).unwrap();

    let names: Vec<&str> = report.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            outputs::INDICATORS,
            outputs::COUNTRY_METADATA,
            outputs::INDICATOR_METADATA,
            outputs::MUNICIPAL_STATS,
            outputs::MUNICIPALITY_METADATA,
            outputs::MERGED_DATASET,
        ]
    );
    for output in &report.outputs {
        assert!(output.path.is_file(), "{} missing", output.name);
    }
}

#[test]
fn test_indicators_output() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());
    run_pipeline(&config).unwrap();

    let text = fs::read_to_string(config.processed_path(outputs::INDICATORS)).unwrap();
    assert_eq!(
        text,
        "Country Name,Country Code,Indicator Name,Indicator Code,Year,Value\n\
\"Korea, Rep.\",KOR,GDP (current US$),NY.GDP.MKTP.CD,2020,200\n\
\"Korea, Rep.\",KOR,\"Population, total\",SP.POP.TOTL,2020,\n\
\"Korea, Rep.\",KOR,GDP (current US$),NY.GDP.MKTP.CD,2021,210\n\
\"Korea, Rep.\",KOR,\"Population, total\",SP.POP.TOTL,2021,52\n"
    );
}

#[test]
fn test_normalized_outputs() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());
    run_pipeline(&config).unwrap();

    let countries = read_csv_file(&config.processed_path(outputs::COUNTRY_METADATA), 0).unwrap();
    assert_eq!(countries.headers()[0], "CountryCode");
    assert_eq!(countries.len(), 1);
    // Only the wide indicator file loses its trailing-delimiter column.
    assert_eq!(countries.headers().last().map(String::as_str), Some("Unnamed: 5"));

    let indicators = read_csv_file(&config.processed_path(outputs::INDICATOR_METADATA), 0).unwrap();
    assert_eq!(&indicators.headers()[..2], &["IndCode", "IndName"]);

    let stats = read_csv_file(&config.processed_path(outputs::MUNICIPAL_STATS), 0).unwrap();
    assert_eq!(stats.headers()[0], "MunicipalityCode");
    assert_eq!(stats.len(), 2);

    let municipalities = fs::read_to_string(config.processed_path(outputs::MUNICIPALITY_METADATA)).unwrap();
    assert_eq!(municipalities, "MunicipalityCode,MunicipalityName\n11,Seoul\n21,Busan\n");
}

#[test]
fn test_merged_dataset() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());
    let report = run_pipeline(&config).unwrap();

    let merged = read_csv_file(&config.processed_path(outputs::MERGED_DATASET), 0).unwrap();

    // Only the GDP indicator has metadata; municipal columns stay empty
    // because the indicator rows carry no municipality code.
    assert_eq!(merged.len(), 2);
    assert_eq!(report.get(outputs::MERGED_DATASET).unwrap().rows, 2);
    assert_eq!(merged.get(0, "Region"), Some("East Asia & Pacific"));
    assert_eq!(merged.get(0, "IndName"), Some("GDP (current US$)"));
    assert_eq!(merged.get(0, "MunicipalityCode"), None);
    assert_eq!(merged.get(0, "Population"), None);
    assert!(merged.column_index("Name").is_some());
}

#[test]
fn test_rerun_is_byte_identical() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());

    run_pipeline(&config).unwrap();
    let first = fs::read(config.processed_path(outputs::MERGED_DATASET)).unwrap();
    run_pipeline(&config).unwrap();
    let second = fs::read(config.processed_path(outputs::MERGED_DATASET)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unmatched_indicator_key_yields_empty_merge() {
    // Metadata keyed by INDICATOR_CODE: the rename is a no-op and the join
    // matches nothing, without failing the run.
    let (_root, config) = setup(INDICATOR_META);

    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.get(outputs::MERGED_DATASET).unwrap().rows, 0);

    let merged = fs::read_to_string(config.processed_path(outputs::MERGED_DATASET)).unwrap();
    assert_eq!(merged.lines().count(), 1);
}

#[test]
fn test_missing_raw_file_fails_load_step() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());
    fs::remove_file(config.raw_path(&config.inputs.municipalities)).unwrap();

    let err = run_pipeline(&config).unwrap_err();
    assert_eq!(err.step(), Step::Load);
    assert!(matches!(err, PipelineError::Load(LoadError::MissingFile { .. })));
    assert!(err.to_string().contains("AAA Municipality.docx"));
}

#[test]
fn test_malformed_year_fails_before_writing() {
    let (_root, config) = setup(&indicator_meta_with_spaced_headers());
    let broken = WIDE.replace("\"2021\"", "\"Notes\"");
    fs::write(config.raw_path(&config.inputs.indicators), broken).unwrap();

    let err = run_pipeline(&config).unwrap_err();
    assert_eq!(err.step(), Step::Reshape);
    assert!(!config.processed_path(outputs::INDICATORS).exists());
}
