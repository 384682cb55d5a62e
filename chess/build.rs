use std::path::Path;
use std::{env, io};

mod leapers {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use chessgate_base::bitboard::Bitboard;
    use chessgate_base::tables;

    fn print_bitboards<W: Write>(w: &mut W, name: &str, bs: [Bitboard; 64]) -> io::Result<()> {
        writeln!(w, "static {}: [Bitboard; 64] = [", name)?;
        for (i, b) in bs.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ bb(0x{:016x}),", i, b.as_raw())?;
        }
        writeln!(w, "];")?;
        Ok(())
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let f = fs::File::create(out_path)?;
        let mut w = BufWriter::new(&f);

        print_bitboards(&mut w, "KNIGHT_MOVES", tables::knight_moves())?;
        writeln!(&mut w)?;
        print_bitboards(&mut w, "KING_MOVES", tables::king_moves())?;

        Ok(())
    }
}

mod rays {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use chessgate_base::tables::{self, Ray};

    fn print_rays<W: Write>(w: &mut W, name: &str, rays: [[Ray; 4]; 64]) -> io::Result<()> {
        writeln!(w, "static {}: [[Ray; 4]; 64] = [", name)?;
        for (i, dirs) in rays.iter().enumerate() {
            writeln!(w, "    /*{:2}*/ [", i)?;
            for ray in dirs {
                let cells = ray
                    .raw_cells()
                    .iter()
                    .map(|c| format!("c({})", c.index()))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(w, "        Ray::from_parts([{}], {}),", cells, ray.len())?;
            }
            writeln!(w, "    ],")?;
        }
        writeln!(w, "];")?;
        Ok(())
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        let f = fs::File::create(out_path)?;
        let mut w = BufWriter::new(&f);

        print_rays(&mut w, "ROOK_RAYS", tables::rook_rays())?;
        writeln!(&mut w)?;
        print_rays(&mut w, "BISHOP_RAYS", tables::bishop_rays())?;

        Ok(())
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../chess_base/src");

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    leapers::gen(&Path::new(&out_dir).join("leapers.rs"))?;
    rays::gen(&Path::new(&out_dir).join("rays.rs"))?;

    Ok(())
}
