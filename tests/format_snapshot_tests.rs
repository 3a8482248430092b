//! Snapshot tests for formatter output
//!
//! Each case formats compact source and pins the result inline; the formatted text must also be a fixed point.
//! Review changes: `cargo insta review`

use sharpen::{BraceStyle, FormatConfig, format_source, format_source_with_config};

fn format_stable(source: &str) -> String {
    let formatted = format_source(source).unwrap_or_else(|errs| panic!("failed to format: {errs:?}"));
    let again = format_source(&formatted).unwrap_or_else(|errs| panic!("formatted output does not parse: {errs:?}"));
    assert_eq!(formatted, again, "formatting is not idempotent");
    formatted
}

#[test]
fn class_with_members() {
    let source = "using System;namespace Demo{public class Point:IEquatable<Point>{public int X{get;private set;}\
        public Point(int x):base(){X=x;}public override string ToString()=>$\"({X})\";}}";
    insta::assert_snapshot!(format_stable(source), @r#"
    using System;

    namespace Demo
    {
        public class Point : IEquatable<Point>
        {
            public int X { get; private set; }

            public Point(int x) : base()
            {
                X = x;
            }

            public override string ToString() => $"({X})";
        }
    }
    "#);
}

#[test]
fn statements() {
    let source = "class C{void M(int[] xs){for(int i=0;i<xs.Length;i++){if(xs[i]>0)continue;else break;}\
        foreach(var x in xs)Console.WriteLine(x);switch(x){case 1:case 2 when y:return;default:throw new Exception();}\
        try{M(null);}catch(Exception e)when(e!=null){}finally{Done();}}}";
    insta::assert_snapshot!(format_stable(source), @r"
    class C
    {
        void M(int[] xs)
        {
            for (int i = 0; i < xs.Length; i++)
            {
                if (xs[i] > 0)
                    continue;
                else
                    break;
            }
            foreach (var x in xs)
                Console.WriteLine(x);
            switch (x)
            {
                case 1:
                case 2 when y:
                    return;
                default:
                    throw new Exception();
            }
            try
            {
                M(null);
            }
            catch (Exception e) when (e != null)
            {
            }
            finally
            {
                Done();
            }
        }
    }
    ");
}

#[test]
fn expressions_print_on_one_line() {
    let source = "class C{void M(){var a=x is Point(var px,_){Y:>0} p&&px>0;\
        Func<int,int> f=async(int v)=>await G(v);\
        var q=from c in cs where c.Age>18 orderby c.Name descending select new{c.Name};\
        int[,] g=new int[2,3];string s=n switch{0=>\"zero\",_ when n<0=>\"neg\",_=>\"pos\"};\
        x??=y??throw new E();var t=(a:1,b:\"two\");int[] r=xs[1..^1];M(out var z,ref w,named:3);var d=(int)(object)x;}}";
    insta::assert_snapshot!(format_stable(source), @r#"
    class C
    {
        void M()
        {
            var a = x is Point(var px, _) { Y: > 0 } p && px > 0;
            Func<int, int> f = async (int v) => await G(v);
            var q = from c in cs where c.Age > 18 orderby c.Name descending select new { c.Name };
            int[,] g = new int[2, 3];
            string s = n switch { 0 => "zero", _ when n < 0 => "neg", _ => "pos" };
            x ??= y ?? throw new E();
            var t = (a: 1, b: "two");
            int[] r = xs[1..^1];
            M(out var z, ref w, named: 3);
            var d = (int)(object)x;
        }
    }
    "#);
}

#[test]
fn declarations() {
    let source = "namespace App.Core;using System.Collections.Generic;[Serializable]public enum Color:byte{Red=1,Green,Blue}\
        public delegate TResult Mapper<in T,out TResult>(T item)where T:class;\
        public interface IRepo<T>where T:class,new(){T this[int id]{get;}event EventHandler Changed;IEnumerable<T> All();}\
        public struct Money{public static Money operator+(Money a,Money b)=>a;\
        public static implicit operator decimal(Money m)=>m.Amount;}";
    insta::assert_snapshot!(format_stable(source), @r"
    namespace App.Core;

    using System.Collections.Generic;

    [Serializable]
    public enum Color : byte
    {
        Red = 1,
        Green,
        Blue
    }

    public delegate TResult Mapper<in T, out TResult>(T item) where T : class;

    public interface IRepo<T> where T : class, new()
    {
        T this[int id] { get; }

        event EventHandler Changed;

        IEnumerable<T> All();
    }

    public struct Money
    {
        public static Money operator +(Money a, Money b) => a;

        public static implicit operator decimal(Money m) => m.Amount;
    }
    ");
}

#[test]
fn same_line_braces() {
    let config = FormatConfig::new()
        .with_brace_style(BraceStyle::SameLine)
        .with_indent_width(2);
    let source = "class C{int P{get{return p;}set{p=value;}}void M(){Run(()=>{Go();});do{i--;}while(i>0);}}";
    let formatted = format_source_with_config(source, config.clone()).unwrap();
    insta::assert_snapshot!(formatted, @r"
    class C {
      int P {
        get {
          return p;
        }
        set {
          p = value;
        }
      }

      void M() {
        Run(() => {
          Go();
        });
        do {
          i--;
        } while (i > 0);
      }
    }
    ");
    assert_eq!(format_source_with_config(&formatted, config).unwrap(), formatted);
}

#[test]
fn reference_returns_and_fixed_buffers() {
    let source = "unsafe struct S{fixed int buf[10];public fixed char a[4],b[N*2];ref int F()=>ref x;\
        ref readonly int P=>ref x;ref int M(){ref int r=ref x;ref readonly int q=ref x;var y=ref x;\
        ref var z=ref c?ref a:ref b;Use(c?ref a:ref b,ref w);return ref x;}}";
    insta::assert_snapshot!(format_stable(source), @r"
    unsafe struct S
    {
        fixed int buf[10];

        public fixed char a[4], b[N * 2];

        ref int F() => ref x;

        ref readonly int P => ref x;

        ref int M()
        {
            ref int r = ref x;
            ref readonly int q = ref x;
            var y = ref x;
            ref var z = ref c ? ref a : ref b;
            Use(c ? ref a : ref b, ref w);
            return ref x;
        }
    }
    ");
}
