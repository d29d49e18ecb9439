use scprep_types::{PipelineError, SampleInfo};

/// Describes how encoded sample names decompose into metadata fields.
///
/// Names split on `delimiter` into exactly `field_count` fields. One field is
/// designated the timepoint; two fields are concatenated into the sample
/// label, with the second optionally truncated to a fixed number of
/// characters first. Field positions are 0-based and caller-configured, never
/// hard-coded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameSchema {
    delimiter: char,
    field_count: usize,
    timepoint_field: usize,
    label_fields: (usize, usize),
    label_truncate: Option<usize>,
}

impl NameSchema {
    /// Build a schema, rejecting field positions outside `field_count`.
    pub fn new(
        delimiter: char,
        field_count: usize,
        timepoint_field: usize,
        label_fields: (usize, usize),
        label_truncate: Option<usize>,
    ) -> Result<NameSchema, PipelineError> {
        let out_of_range = [timepoint_field, label_fields.0, label_fields.1]
            .into_iter()
            .find(|&f| f >= field_count);
        if let Some(field) = out_of_range {
            return Err(PipelineError::InvalidSchema {
                reason: format!("field index {field} out of range for {field_count} fields"),
            });
        }
        Ok(NameSchema {
            delimiter,
            field_count,
            timepoint_field,
            label_fields,
            label_truncate,
        })
    }

    /// Parse one sample name into its metadata record. Pure and
    /// deterministic; fails if the name does not split into the declared
    /// number of fields.
    pub fn parse(&self, name: &str) -> Result<SampleInfo, PipelineError> {
        let fields: Vec<&str> = name.split(self.delimiter).collect();
        if fields.len() != self.field_count {
            return Err(PipelineError::MalformedSampleName {
                name: name.to_string(),
                expected: self.field_count,
                actual: fields.len(),
            });
        }

        let timepoint = fields[self.timepoint_field].to_string();
        let (first, second) = self.label_fields;
        let mut label = fields[first].to_string();
        match self.label_truncate {
            Some(len) => label.extend(fields[second].chars().take(len)),
            None => label.push_str(fields[second]),
        }

        Ok(SampleInfo {
            name: name.to_string(),
            timepoint,
            label,
        })
    }
}

/// Parse an ordered sequence of sample names against one schema, preserving
/// order. The first malformed name aborts the parse.
pub fn parse_sample_names<S: AsRef<str>>(
    schema: &NameSchema,
    names: &[S],
) -> Result<Vec<SampleInfo>, PipelineError> {
    names.iter().map(|name| schema.parse(name.as_ref())).collect()
}
