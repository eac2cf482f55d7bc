#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use cmdreply_core::MentionType;
use cmdreply_dispatch::dispatch::ReplyDispatcher;
use cmdreply_dispatch::reply_file::ReplyFile;
use cmdreply_dispatch::transport::DryRunTransport;

#[tokio::test]
async fn reply_file_drives_full_dispatch() {
    let dir = std::env::temp_dir().join(format!("cmdreply-reply-file-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let attachment = dir.join("report.txt");
    std::fs::write(&attachment, b"all green").unwrap();

    let yaml = format!(
        r#"
interaction: {{ id: 81234, token: "tok" }}
content: "nightly report"
ephemeral: true
embeds:
  - title: "Build"
    color: 65280
files:
  - path: "{}"
    spoiler: true
allowed_mentions: [user]
mention_users: ["99"]
"#,
        attachment.display()
    );

    let transport = Arc::new(DryRunTransport::new());
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let action = yaml.parse::<ReplyFile>().unwrap().into_action(&dispatcher).unwrap();
    assert_eq!(action.state().mentions().allowed().len(), 1);
    assert!(action.state().mentions().allowed().contains(&MentionType::User));
    assert!(action.state().mentions().users().contains(&99));

    let handle = action.submit().await.unwrap();
    assert!(handle.is_ready());

    let rec = transport.recorded().pop().unwrap();
    assert_eq!(rec.route.path, "interactions/81234/tok/callback");
    assert_eq!(rec.files.len(), 1);
    assert_eq!(rec.files[0].1, "SPOILER_report.txt");
    assert_eq!(&rec.files[0].2[..], b"all green");

    let v: serde_json::Value = serde_json::from_str(&rec.document).unwrap();
    assert_eq!(v["data"]["flags"], 64);
    assert_eq!(v["data"]["embeds"][0]["title"], "Build");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_keys_and_bad_ids_are_rejected() {
    let err = "interaction: { id: 1, token: t }\ncontnet: hi".parse::<ReplyFile>().expect_err("typo");
    assert_eq!(err.code().as_str(), "CONFIG");

    let dispatcher = ReplyDispatcher::new(Arc::new(DryRunTransport::new()));
    let file = "interaction: { id: 1, token: t }\nmention_roles: [\"abc\"]".parse::<ReplyFile>().unwrap();
    let err = file.into_action(&dispatcher).err().expect("bad snowflake");
    assert_eq!(err.code().as_str(), "INVALID_PARAMETER");

    let file = "interaction: { id: 1, token: t }\nfiles: [ { path: /definitely/missing/file.bin } ]"
        .parse::<ReplyFile>()
        .unwrap();
    let err = file.into_action(&dispatcher).err().expect("missing file");
    assert_eq!(err.code().as_str(), "INVALID_PARAMETER");
}

#[test]
fn load_parses_reply_file_from_disk() {
    let dir = std::env::temp_dir().join(format!("cmdreply-load-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("reply.yaml");
    std::fs::write(&path, "interaction: { id: 5, token: abc }\ncontent: hello\ntts: true").unwrap();

    let file = ReplyFile::load(&path).unwrap();
    let dispatcher = ReplyDispatcher::new(Arc::new(DryRunTransport::new()));
    let action = file.into_action(&dispatcher).unwrap();
    assert_eq!(action.state().content(), "hello");
    assert!(action.state().tts());
    assert_eq!(action.route().path, "interactions/5/abc/callback");

    let _ = std::fs::remove_dir_all(&dir);
}
