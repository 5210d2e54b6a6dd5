//! Header policies and row augmentation, end to end.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_flatcsv::{
    from_str, from_str_with_options, to_string, to_string_with_options, Csv, CsvDecoder,
    CsvEncoder, CsvOptions, DecodeHeader, EncodeHeader, Error, Header,
};

const GRID: &str = "a1,a2,a3\n1,2,3\n4,5,6\n7,8,9";

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct FooBarBaz {
    a1: i64,
    a2: i64,
    a3: i64,
}

fn rename(entries: &[(&str, &str)]) -> IndexMap<String, String> {
    entries
        .iter()
        .map(|(new, old)| (new.to_string(), old.to_string()))
        .collect()
}

#[test]
fn test_encode_decode_equality() {
    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();
    let encoded = to_string(&parsed).unwrap();
    assert_eq!(encoded, GRID);
}

#[test]
fn test_formula_representation() {
    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();
    let augmented = parsed.formula("a2^2", |row| row.a2 * row.a2);

    let encoded = to_string(&augmented).unwrap();
    assert_eq!(encoded, "a1,a2,a3,a2^2\n1,2,3,4\n4,5,6,25\n7,8,9,64");
}

#[test]
fn test_attached_column_representation() {
    #[derive(Serialize, Clone)]
    struct Tag {
        batch: String,
    }

    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();
    let tagged = parsed.fill(Tag {
        batch: "b7".to_string(),
    });

    let encoded = to_string(&tagged).unwrap();
    assert_eq!(encoded, "a1,a2,a3,batch\n1,2,3,b7\n4,5,6,b7\n7,8,9,b7");
}

#[test]
fn test_per_row_attachment() {
    #[derive(Serialize)]
    struct Rank {
        rank: u32,
    }

    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();
    let ranked = parsed.attach((1..).map(|rank| Rank { rank }));

    let encoded = to_string(&ranked).unwrap();
    assert_eq!(encoded, "a1,a2,a3,rank\n1,2,3,1\n4,5,6,2\n7,8,9,3");
}

#[test]
fn test_key_separation() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Foo {
        foo: Bar,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Bar {
        bar: i64,
    }

    let options = CsvOptions::new().with_key_separator(" - ");
    let encoder = CsvEncoder::with_options(options.clone());
    let decoder = CsvDecoder::with_options(options);

    let typed = Csv::from(vec![Foo {
        foo: Bar { bar: 42 },
    }]);

    let csv = encoder.encode(&typed, EncodeHeader::Infer).unwrap();
    assert_eq!(csv, "foo - bar\n42");

    let decoded: Csv<Foo> = decoder.decode(&csv, DecodeHeader::FirstLine).unwrap();
    assert_eq!(typed, decoded);
}

#[test]
fn test_omit_header() {
    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();
    let encoded =
        to_string_with_options(&parsed, CsvOptions::default(), EncodeHeader::Omit).unwrap();
    assert_eq!(encoded, "1,2,3\n4,5,6\n7,8,9");
}

#[test]
fn test_supplied_header_without_first_line() {
    let header = Header::infer(&["a1", "a2", "a3"]).unwrap();
    let table: Csv<FooBarBaz> = from_str_with_options(
        "1,2,3\n4,5,6",
        CsvOptions::default(),
        DecodeHeader::Supplied {
            header,
            skip_first_line: false,
        },
    )
    .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        table[0],
        FooBarBaz {
            a1: 1,
            a2: 2,
            a3: 3
        }
    );
}

#[test]
fn test_supplied_header_with_skip() {
    // The real first line is discarded unread; the supplied header wins.
    let header = Header::infer(&["a1", "a2", "a3"]).unwrap();
    let table: Csv<FooBarBaz> = from_str_with_options(
        "x,y,z\n1,2,3",
        CsvOptions::default(),
        DecodeHeader::Supplied {
            header,
            skip_first_line: true,
        },
    )
    .unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].a2, 2);
}

#[test]
fn test_supplied_header_column_permutation() {
    let header: Header = [
        ("a3".to_string(), 0),
        ("a2".to_string(), 1),
        ("a1".to_string(), 2),
    ]
    .into_iter()
    .collect();

    let table: Csv<FooBarBaz> = from_str_with_options(
        "3,2,1",
        CsvOptions::default(),
        DecodeHeader::Supplied {
            header,
            skip_first_line: false,
        },
    )
    .unwrap();

    assert_eq!(
        table[0],
        FooBarBaz {
            a1: 1,
            a2: 2,
            a3: 3
        }
    );
}

#[test]
fn test_rename_header_soft_merge_on_decode() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Foo {
        foo: Bar,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Bar {
        bar: i64,
    }

    // Input header says "answer"; the target shape's flattened key is
    // "foo bar". The rename mapping bridges the two.
    let table: Csv<Foo> = from_str_with_options(
        "answer\n42",
        CsvOptions::default(),
        DecodeHeader::Rename(rename(&[("foo bar", "answer")])),
    )
    .unwrap();

    assert_eq!(table[0].foo.bar, 42);
}

#[test]
fn test_rename_entry_with_missing_source_drops_silently() {
    // "ghost" names a column the input does not have: header-building
    // succeeds, and the gap only surfaces if a shape requires that key.
    let mapping = rename(&[("a1", "a1"), ("a2", "a2"), ("a3", "a3"), ("x", "ghost")]);

    let table: Csv<FooBarBaz> = from_str_with_options(
        GRID,
        CsvOptions::default(),
        DecodeHeader::Rename(mapping.clone()),
    )
    .unwrap();
    assert_eq!(table.len(), 3);

    // A shape that does need the dropped key reports an ordinary miss.
    #[derive(Deserialize, Debug)]
    struct NeedsX {
        #[allow(dead_code)]
        x: i64,
    }

    let err =
        from_str_with_options::<NeedsX>(GRID, CsvOptions::default(), DecodeHeader::Rename(mapping))
            .unwrap_err();
    assert_eq!(
        err,
        Error::KeyNotFound {
            key: "x".to_string()
        }
    );
}

#[test]
fn test_rename_header_on_encode() {
    let parsed: Csv<FooBarBaz> = from_str(GRID).unwrap();

    // Publish "a2" under a prettier name; unmatched entries drop out of the
    // header line while the cells stay put.
    let mapping = rename(&[("A1", "a1"), ("middle", "a2"), ("A3", "a3"), ("x", "ghost")]);
    let encoded = to_string_with_options(
        &parsed,
        CsvOptions::default(),
        EncodeHeader::Rename(mapping),
    )
    .unwrap();

    assert_eq!(encoded, "A1,middle,A3\n1,2,3\n4,5,6\n7,8,9");
}

#[test]
fn test_empty_table_encodes_to_empty_text() {
    let empty: Csv<FooBarBaz> = Csv::new();
    assert_eq!(to_string(&empty).unwrap(), "");
}

#[test]
fn test_decode_empty_text_is_an_error() {
    assert_eq!(
        from_str::<FooBarBaz>("").unwrap_err(),
        Error::EmptyInput
    );
    // A lone row separator has no lines either.
    assert_eq!(
        from_str::<FooBarBaz>("\n").unwrap_err(),
        Error::EmptyInput
    );
}
