use crate::config::{IamRoleConfig, S3Config};

const JSON_AUTO: &str = "auto";

// Redshift only accepts these values as literals, they cannot be bound.
fn copy_table_request(
    table_name: &str,
    source: &str,
    iam_role: &str,
    json_format: &str,
    region: &str,
) -> String {
    format!(
        r#"
COPY {table_name} FROM '{source}'
CREDENTIALS 'aws_iam_role={iam_role}'
JSON '{json_format}'
REGION '{region}';
"#
    )
}

pub fn copy_table_requests(s3: &S3Config, iam_role: &IamRoleConfig, region: &str) -> Vec<String> {
    vec![
        copy_table_request(
            "staging_events",
            &s3.log_data,
            &iam_role.arn,
            &s3.log_jsonpath,
            region,
        ),
        copy_table_request(
            "staging_songs",
            &s3.song_data,
            &iam_role.arn,
            JSON_AUTO,
            region,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::create_mock_config;

    #[test]
    fn test_copy_table_request() {
        let request = copy_table_request(
            "staging_events",
            "s3://bucket/log_data",
            "arn:aws:iam::1:role/r",
            "s3://bucket/paths.json",
            "eu-west-1",
        );
        let expected = r#"
COPY staging_events FROM 's3://bucket/log_data'
CREDENTIALS 'aws_iam_role=arn:aws:iam::1:role/r'
JSON 's3://bucket/paths.json'
REGION 'eu-west-1';
"#;

        assert_eq!(request, expected);
    }

    #[test]
    fn test_copy_table_requests() {
        let config = create_mock_config();
        let requests = copy_table_requests(&config.s3, &config.iam_role, &config.cluster.region);

        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0],
            r#"
COPY staging_events FROM 's3://udacity-dend/log_data'
CREDENTIALS 'aws_iam_role=arn:aws:iam::123456789012:role/dwhRole'
JSON 's3://udacity-dend/log_json_path.json'
REGION 'us-west-2';
"#
        );
        assert_eq!(
            requests[1],
            r#"
COPY staging_songs FROM 's3://udacity-dend/song_data'
CREDENTIALS 'aws_iam_role=arn:aws:iam::123456789012:role/dwhRole'
JSON 'auto'
REGION 'us-west-2';
"#
        );
    }
}
