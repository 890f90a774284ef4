use std::path::Path;

use assert_cmd::Command;

const CORPUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<document id="d">
  <sentence id="d.s0" text="Drug-A inhibits Drug-B activity.">
    <entity id="d.s0.e0" charOffset="0-5" type="drug" text="Drug-A"/>
    <entity id="d.s0.e1" charOffset="16-21" type="drug" text="Drug-B"/>
    <pair id="d.s0.p0" e1="d.s0.e0" e2="d.s0.e1" ddi="true" type="effect"/>
  </sentence>
  <sentence id="d.s1" text="Aspirin and warfarin.">
    <entity id="d.s1.e0" charOffset="0-6" type="drug" text="Aspirin"/>
    <entity id="d.s1.e1" charOffset="40-47" type="drug" text="ghost"/>
    <pair id="d.s1.p0" e1="d.s1.e0" e2="d.s1.e1" ddi="false"/>
  </sentence>
  <sentence id="d.s2" text="Only ibuprofen here.">
    <entity id="d.s2.e0" charOffset="5-13" type="drug" text="ibuprofen"/>
  </sentence>
</document>"#;

const PARSES: &str = "\
# sent_id = d.s0
1\tDrug-A\tDrug-A\tPROPN\tNNP\t_\t2\tnsubj\t_\t_
2\tinhibits\tinhibit\tVERB\tVBZ\t_\t0\troot\t_\t_
3\tDrug-B\tDrug-B\tPROPN\tNNP\t_\t4\tcompound\t_\t_
4\tactivity\tactivity\tNOUN\tNN\t_\t2\tobj\t_\t_
5\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# sent_id = d.s1
1\tAspirin\taspirin\tNOUN\tNN\t_\t0\troot\t_\t_
2\tand\tand\tCCONJ\tCC\t_\t3\tcc\t_\t_
3\twarfarin\twarfarin\tNOUN\tNN\t_\t1\tconj\t_\t_
4\t.\t.\tPUNCT\t.\t_\t1\tpunct\t_\t_
";

fn corpus_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("d.xml"), CORPUS).unwrap();
    std::fs::write(dir.path().join("d.conllu"), PARSES).unwrap();
    dir
}

fn run(sub: &str, dir: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("ddi-features")
        .unwrap()
        .current_dir(dir)
        .env("DDI_RESOURCES_DIR", dir.join("resources"))
        .env_remove("DDI_DRUGBANK_PATH")
        .env_remove("DDI_HSDB_PATH")
        .env_remove("DDI_PARSE_DIR")
        .env_remove("DDI_BETWEEN_WALK")
        .args([sub, dir.to_str().unwrap()])
        .assert()
}

#[test]
fn pairs_emit_one_line_per_featurizable_pair() {
    let dir = corpus_dir();
    let output = run("pairs", dir.path()).success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(
        text,
        "d.s0\td.s0.e0\td.s0.e1\teffect\teib=False\tlemma_1=inhibit\tlib=inhibit\t\
         lpib=inhibit_VBZ\tpath=Drug-A_nsubj<inhibit_root>activity_obj>Drug-B_compound\t\
         path1=Drug-A_nsubj\tpath2=activity_obj>Drug-B_compound\tpos_1=VBZ\trelType_1=root\t\
         relation_0=adverse\twib=inhibits\n"
    );
}

#[test]
fn ner_emits_every_token_with_blank_separators() {
    let dir = corpus_dir();
    let output = run("ner", dir.path()).success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    let blocks: Vec<&str> = text.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].lines().count(), 5);
    assert!(blocks[1].contains("d.s1\tAspirin\t0\t6\tB-drug\t"));
    assert!(blocks[1].contains("d.s1\twarfarin\t12\t19\tO\t"));
    assert!(blocks[2].contains("d.s2\tibuprofen\t5\t13\tB-drug\tform=ibuprofen\tsuf3=fen\tcommonDrugName=T\t"));
}

#[test]
fn output_is_reproducible() {
    let dir = corpus_dir();
    for sub in ["ner", "pairs"] {
        let first = run(sub, dir.path()).success().get_output().stdout.clone();
        let second = run(sub, dir.path()).success().get_output().stdout.clone();
        assert_eq!(first, second);
    }
}

#[test]
fn malformed_corpus_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bad.xml"),
        r#"<document id="x"><sentence id="x.s0" text="a b">
             <entity id="x.s0.e0" charOffset="one-two" type="drug"/>
           </sentence></document>"#,
    )
    .unwrap();
    let assert = run("ner", dir.path()).failure();
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn missing_parse_file_is_fatal_for_pairs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("d.xml"), CORPUS).unwrap();
    run("pairs", dir.path()).failure();
}

#[test]
fn legacy_walk_is_selected_through_the_environment() {
    let dir = corpus_dir();
    let output = Command::cargo_bin("ddi-features")
        .unwrap()
        .current_dir(dir.path())
        .env("DDI_RESOURCES_DIR", dir.path().join("resources"))
        .env("DDI_BETWEEN_WALK", "first-content-word")
        .env_remove("DDI_PARSE_DIR")
        .args(["pairs", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\tlib=inhibit\t"));

    Command::cargo_bin("ddi-features")
        .unwrap()
        .current_dir(dir.path())
        .env("DDI_BETWEEN_WALK", "sideways")
        .args(["pairs", dir.path().to_str().unwrap()])
        .assert()
        .failure();
}
