use bonebake_core::{
    parse_atlas_json, AtlasDoc, AtlasError, PixelRect, SliceTable, SpriteRecord, Vec2,
};

fn record(name: &str, x: i32, y: i32, width: i32, height: i32) -> SpriteRecord {
    SpriteRecord {
        name: name.to_string(),
        x,
        y,
        width,
        height,
        offset_x: 0.0,
        offset_y: 0.0,
    }
}

#[test]
fn slicing_flips_y_to_top_left_origin() {
    let doc = AtlasDoc {
        sheet_height: 512,
        sprites: vec![record("a.png", 10, 20, 40, 30)],
    };
    let table = SliceTable::from_doc(&doc);
    let slice = table.lookup("a.png").expect("slice");
    assert_eq!(
        slice.rect,
        PixelRect {
            x: 10,
            y: 462,
            width: 40,
            height: 30
        }
    );
}

#[test]
fn pivot_is_the_packer_offset() {
    let mut rec = record("b.png", 0, 0, 8, 8);
    rec.offset_x = 1.5;
    rec.offset_y = -2.0;
    let table = SliceTable::from_doc(&AtlasDoc {
        sheet_height: 64,
        sprites: vec![rec],
    });
    assert_eq!(table.lookup("b.png").unwrap().pivot, Vec2::new(1.5, -2.0));
}

#[test]
fn lookup_of_unknown_sprite_fails_with_its_name() {
    let table = SliceTable::new();
    assert_eq!(
        table.lookup("ghost.png").unwrap_err(),
        AtlasError::MissingSlice("ghost.png".into())
    );
}

#[test]
fn duplicate_sprite_names_keep_last_record_in_first_position() {
    let doc = AtlasDoc {
        sheet_height: 100,
        sprites: vec![
            record("dup.png", 0, 0, 10, 10),
            record("other.png", 0, 0, 5, 5),
            record("dup.png", 50, 0, 20, 20),
        ],
    };
    let table = SliceTable::from_doc(&doc);
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("dup.png").unwrap().rect.x, 50);
    let names: Vec<&str> = table.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["dup.png", "other.png"]);
}

#[test]
fn fixture_atlas_slices_every_frame() {
    let json = bonebake_test_fixtures::atlases::json("walker").expect("load walker atlas");
    let doc = parse_atlas_json(&json).expect("parse walker atlas");
    assert_eq!(doc.sheet_height, 256);

    let table = SliceTable::from_doc(&doc);
    assert_eq!(table.len(), 5);
    let body = table.lookup("body.png").unwrap();
    assert_eq!(body.rect.y, 256 - 96);
    assert_eq!(body.pivot, Vec2::new(2.0, -4.0));
    let head = table.lookup("head.png").unwrap();
    assert_eq!(head.rect.y, 256 - 96 - 64);
}
